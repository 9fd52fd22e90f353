use crate::render::{run_render, RenderArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use application_docs::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Application Document Service",
    about = "Serve and render PDF documents describing onboarding application state",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate the document for a single application and write it to disk
    Render(RenderArgs),
}

/// Where application records, templates, and the PDF engine come from.
#[derive(Args, Debug, Clone)]
pub(crate) struct SourceArgs {
    /// JSON file holding an array of application records
    #[arg(long, env = "APP_APPLICATIONS_FILE", default_value = "data/applications.json")]
    pub(crate) applications: PathBuf,
    /// Base location template paths are resolved against
    #[arg(long, env = "APP_TEMPLATES_URI", default_value = "templates/")]
    pub(crate) templates: String,
    /// wkhtmltopdf executable used for HTML-to-PDF conversion
    #[arg(long, env = "APP_WKHTMLTOPDF", default_value = "wkhtmltopdf")]
    pub(crate) wkhtmltopdf: String,
}

#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) sources: SourceArgs,
}

/// `serve` arguments taken from the environment and defaults alone.
#[derive(Parser, Debug)]
#[command(name = "application-docs-api")]
struct DefaultServe {
    #[command(flatten)]
    args: ServeArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = match cli.command {
        Some(command) => command,
        None => Command::Serve(DefaultServe::parse_from(["application-docs-api"]).args),
    };

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Render(args) => run_render(args),
    }
}
