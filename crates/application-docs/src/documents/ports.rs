//! Contracts for the collaborators the document generator depends on.
//!
//! Persistence, template rendering, and HTML-to-PDF conversion live outside this crate and are
//! reached only through these traits.

use super::domain::{Application, ApplicationId};
use super::view::ApplicationView;

/// Header fragment placed at the top of the first page of every generated document.
pub const PDF_HEADER_HTML: &str = concat!(
    "<div class=\"document-header\">",
    "<span class=\"document-header__title\">Application Summary</span>",
    "</div>"
);

/// Lookup of application records.
pub trait ApplicationRepository: Send + Sync {
    fn find_application_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError>;
}

/// Maps a logical template name to a path fragment appended to the caller's base URI.
pub trait TemplatePathProvider: Send + Sync {
    fn resolve(&self, template_name: &str) -> Result<String, TemplatePathError>;
}

/// Renders a template located at `path` with the given view model.
pub trait ViewRenderer: Send + Sync {
    fn render_from_path(&self, path: &str, view: &ApplicationView) -> Result<String, RenderError>;
}

/// Converts rendered HTML into a PDF document.
pub trait PdfConverter: Send + Sync {
    fn render_from_html(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, PdfError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored application is malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TemplatePathError {
    #[error("no template registered for '{0}'")]
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template '{path}' could not be loaded: {reason}")]
    Template { path: String, reason: String },
    #[error("template rendering failed: {0}")]
    Engine(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("pdf engine failed: {0}")]
    Engine(String),
    #[error("pdf engine io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumbers {
    None,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRepeat {
    FirstPageOnly,
    AllPages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOptions {
    pub repeat: HeaderRepeat,
    pub html: String,
}

/// Layout options passed to the PDF converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOptions {
    pub page_numbers: PageNumbers,
    pub header: HeaderOptions,
}

impl PdfOptions {
    /// Numeric page numbers with [`PDF_HEADER_HTML`] on the first page only.
    pub fn application_document() -> Self {
        Self {
            page_numbers: PageNumbers::Numeric,
            header: HeaderOptions {
                repeat: HeaderRepeat::FirstPageOnly,
                html: PDF_HEADER_HTML.to_string(),
            },
        }
    }
}

/// Binary PDF produced by a converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
