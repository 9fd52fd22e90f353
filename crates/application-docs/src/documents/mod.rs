//! Application document generation: state dispatch, view models, and the collaborator
//! contracts used to render and convert them.

pub mod domain;
pub mod generator;
pub mod ports;
pub mod router;
pub(crate) mod template_path;
pub mod view;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationState, Fund, LegalEntity, Person, Product, Review,
};
pub use generator::{
    ApplicationDocumentGenerator, ApplicationDocumentGeneratorBuilder, ConstructionError,
    DocumentError,
};
pub use ports::{
    ApplicationRepository, HeaderOptions, HeaderRepeat, PageNumbers, PdfConverter, PdfDocument,
    PdfError, PdfOptions, RenderError, RepositoryError, TemplatePathError, TemplatePathProvider,
    ViewRenderer, PDF_HEADER_HTML,
};
pub use router::{document_router, DocumentRouteState};
pub use template_path::normalize_base_uri;
pub use view::{
    ActivatedApplicationView, ApplicationSummary, ApplicationView, DocumentTemplate,
    InReviewApplicationView, PendingApplicationView, PortfolioSection,
};
