use application_docs::config::DocumentConfig;
use application_docs::documents::{
    Application, ApplicationDocumentGenerator, ApplicationId, ApplicationRepository,
    ApplicationView, HeaderOptions, HeaderRepeat, PageNumbers, PdfConverter, PdfDocument,
    PdfError, PdfOptions, RenderError, RepositoryError, TemplatePathError, TemplatePathProvider,
    ViewRenderer,
};
use application_docs::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use minijinja::Environment;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cli::SourceArgs;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read-only application records loaded from a JSON array on startup.
#[derive(Default, Clone)]
pub(crate) struct JsonApplicationRepository {
    records: Arc<HashMap<ApplicationId, Application>>,
}

impl JsonApplicationRepository {
    pub(crate) fn from_json(raw: &str) -> Result<Self, RepositoryError> {
        let applications: Vec<Application> = serde_json::from_str(raw)
            .map_err(|err| RepositoryError::Malformed(err.to_string()))?;
        let records = applications
            .into_iter()
            .map(|application| (application.id, application))
            .collect();
        Ok(Self {
            records: Arc::new(records),
        })
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, RepositoryError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            RepositoryError::Unavailable(format!("{}: {err}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

impl ApplicationRepository for JsonApplicationRepository {
    fn find_application_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.records.get(id).cloned())
    }
}

/// Resolves every template to `/{name}.html` beneath the caller's base location.
pub(crate) struct DirectoryTemplatePaths;

impl TemplatePathProvider for DirectoryTemplatePaths {
    fn resolve(&self, template_name: &str) -> Result<String, TemplatePathError> {
        if template_name.is_empty() {
            return Err(TemplatePathError::Unknown(template_name.to_string()));
        }
        Ok(format!("/{template_name}.html"))
    }
}

/// Loads the template from disk on every call and renders it with minijinja.
pub(crate) struct MiniJinjaRenderer;

impl ViewRenderer for MiniJinjaRenderer {
    fn render_from_path(&self, path: &str, view: &ApplicationView) -> Result<String, RenderError> {
        let file = path.strip_prefix("file://").unwrap_or(path);
        let source = std::fs::read_to_string(file).map_err(|err| RenderError::Template {
            path: path.to_string(),
            reason: err.to_string(),
        })?;

        let env = Environment::new();
        let template = env
            .template_from_named_str(file, &source)
            .map_err(|err| RenderError::Template {
                path: path.to_string(),
                reason: err.to_string(),
            })?;
        template
            .render(view)
            .map_err(|err| RenderError::Engine(err.to_string()))
    }
}

/// Shells out to `wkhtmltopdf`, streaming the PDF back over stdout.
pub(crate) struct WkhtmltopdfConverter {
    binary: String,
}

impl WkhtmltopdfConverter {
    pub(crate) fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl PdfConverter for WkhtmltopdfConverter {
    fn render_from_html(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, PdfError> {
        let mut header = html_tempfile(&header_document(&options.header))?;
        header.flush()?;
        let mut input = html_tempfile(html)?;
        input.flush()?;

        let output = Command::new(&self.binary)
            .args(wkhtmltopdf_args(options, header.path(), input.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::Engine(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(PdfDocument::from_bytes(output.stdout))
    }
}

fn html_tempfile(contents: &str) -> Result<tempfile::NamedTempFile, PdfError> {
    let mut file = tempfile::Builder::new()
        .prefix("application-doc-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

pub(crate) fn wkhtmltopdf_args(
    options: &PdfOptions,
    header: &Path,
    input: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--quiet".into()];
    args.push("--header-html".into());
    args.push(header.as_os_str().to_owned());
    if options.page_numbers == PageNumbers::Numeric {
        args.push("--footer-center".into());
        args.push("[page]".into());
    }
    args.push(input.as_os_str().to_owned());
    args.push("-".into());
    args
}

/// Standalone header page; wkhtmltopdf passes the page number in the query string.
pub(crate) fn header_document(header: &HeaderOptions) -> String {
    let script = match header.repeat {
        HeaderRepeat::AllPages => "",
        HeaderRepeat::FirstPageOnly => concat!(
            "<script>function firstPageOnly(){",
            "var m=/[?&]page=(\\d+)/.exec(document.location.search);",
            "if(!m||m[1]!=='1'){document.body.style.visibility='hidden';}",
            "}</script>"
        ),
    };
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">{script}</head>\
         <body onload=\"{}\">{}</body></html>",
        if script.is_empty() { "" } else { "firstPageOnly()" },
        header.html
    )
}

pub(crate) fn build_generator(
    sources: &SourceArgs,
    config: DocumentConfig,
) -> Result<ApplicationDocumentGenerator, AppError> {
    let repository = JsonApplicationRepository::from_path(&sources.applications)?;
    tracing::info!(
        applications = repository.len(),
        path = %sources.applications.display(),
        "loaded application records"
    );

    let generator = ApplicationDocumentGenerator::builder()
        .repository(Arc::new(repository))
        .template_paths(Arc::new(DirectoryTemplatePaths))
        .renderer(Arc::new(MiniJinjaRenderer))
        .pdf_converter(Arc::new(WkhtmltopdfConverter::new(
            sources.wkhtmltopdf.clone(),
        )))
        .config(config)
        .build()?;
    Ok(generator)
}

pub(crate) fn default_output_path(application_id: &ApplicationId) -> PathBuf {
    PathBuf::from(format!("application-{application_id}.pdf"))
}
