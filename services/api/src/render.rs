use crate::cli::SourceArgs;
use crate::infra::{build_generator, default_output_path};
use application_docs::config::AppConfig;
use application_docs::documents::ApplicationId;
use application_docs::error::AppError;
use application_docs::telemetry;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Identifier (UUID) of the application to render
    #[arg(long, value_parser = parse_application_id)]
    pub(crate) application_id: ApplicationId,
    /// Destination file (defaults to application-<id>.pdf)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) sources: SourceArgs,
}

fn parse_application_id(raw: &str) -> Result<ApplicationId, String> {
    ApplicationId::parse(raw).map_err(|err| format!("failed to parse '{raw}' as a UUID ({err})"))
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let RenderArgs {
        application_id,
        output,
        sources,
    } = args;

    let generator = build_generator(&sources, config.documents)?;
    match generator.generate(&application_id, &sources.templates)? {
        Some(bytes) => {
            let output = output.unwrap_or_else(|| default_output_path(&application_id));
            std::fs::write(&output, &bytes)?;
            println!(
                "Wrote {} bytes for application {} to {}",
                bytes.len(),
                application_id,
                output.display()
            );
        }
        None => {
            println!(
                "No document could be produced for application {} in its current state",
                application_id
            );
        }
    }

    Ok(())
}
