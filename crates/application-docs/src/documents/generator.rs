use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::ApplicationId;
use super::ports::{
    ApplicationRepository, PdfConverter, PdfError, PdfOptions, RenderError, RepositoryError,
    TemplatePathError, TemplatePathProvider, ViewRenderer,
};
use super::template_path::TemplateLocator;
use super::view::ApplicationView;
use crate::config::DocumentConfig;

/// Produces the PDF describing an application's current lifecycle state.
pub struct ApplicationDocumentGenerator {
    repository: Arc<dyn ApplicationRepository>,
    templates: TemplateLocator,
    renderer: Arc<dyn ViewRenderer>,
    pdf: Arc<dyn PdfConverter>,
    config: DocumentConfig,
}

impl ApplicationDocumentGenerator {
    pub fn new(
        repository: Arc<dyn ApplicationRepository>,
        template_paths: Arc<dyn TemplatePathProvider>,
        renderer: Arc<dyn ViewRenderer>,
        pdf: Arc<dyn PdfConverter>,
        config: DocumentConfig,
    ) -> Self {
        Self {
            repository,
            templates: TemplateLocator::new(template_paths),
            renderer,
            pdf,
            config,
        }
    }

    pub fn builder() -> ApplicationDocumentGeneratorBuilder {
        ApplicationDocumentGeneratorBuilder::default()
    }

    /// Generates the document for `application_id`.
    ///
    /// Returns `Ok(None)` when the application does not exist or its state has no document;
    /// both cases are logged. Collaborator failures are returned as errors.
    pub fn generate(
        &self,
        application_id: &ApplicationId,
        base_uri: &str,
    ) -> Result<Option<Vec<u8>>, DocumentError> {
        let Some(application) = self.repository.find_application_by_id(application_id)? else {
            warn!(%application_id, "No application found for id '{application_id}'");
            return Ok(None);
        };

        let Some(view) = ApplicationView::build(&application, &self.config) else {
            warn!(
                %application_id,
                state = %application.state,
                "The application is in state '{}' and no valid document can be generated for it",
                application.state
            );
            return Ok(None);
        };

        let template = view.template();
        let path = self.templates.locate(base_uri, template)?;
        debug!(
            %application_id,
            template = template.name(),
            %path,
            "rendering application document"
        );

        let html = self.renderer.render_from_path(&path, &view)?;
        if html.is_empty() {
            warn!(
                %application_id,
                %path,
                "template rendered no content; skipping pdf conversion"
            );
            return Ok(None);
        }

        let document = self
            .pdf
            .render_from_html(&html, &PdfOptions::application_document())?;
        Ok(Some(document.into_bytes()))
    }
}

/// Collects collaborators and refuses to build until all of them are present.
#[derive(Default)]
pub struct ApplicationDocumentGeneratorBuilder {
    repository: Option<Arc<dyn ApplicationRepository>>,
    template_paths: Option<Arc<dyn TemplatePathProvider>>,
    renderer: Option<Arc<dyn ViewRenderer>>,
    pdf: Option<Arc<dyn PdfConverter>>,
    config: Option<DocumentConfig>,
}

impl ApplicationDocumentGeneratorBuilder {
    pub fn repository(mut self, repository: Arc<dyn ApplicationRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn template_paths(mut self, template_paths: Arc<dyn TemplatePathProvider>) -> Self {
        self.template_paths = Some(template_paths);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn pdf_converter(mut self, pdf: Arc<dyn PdfConverter>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    pub fn config(mut self, config: DocumentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<ApplicationDocumentGenerator, ConstructionError> {
        let repository = self
            .repository
            .ok_or(ConstructionError::MissingDependency("repository"))?;
        let template_paths = self
            .template_paths
            .ok_or(ConstructionError::MissingDependency("template_paths"))?;
        let renderer = self
            .renderer
            .ok_or(ConstructionError::MissingDependency("renderer"))?;
        let pdf = self
            .pdf
            .ok_or(ConstructionError::MissingDependency("pdf_converter"))?;
        let config = self
            .config
            .ok_or(ConstructionError::MissingDependency("config"))?;

        Ok(ApplicationDocumentGenerator::new(
            repository,
            template_paths,
            renderer,
            pdf,
            config,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("document generator requires a {0} dependency")]
    MissingDependency(&'static str),
}

/// Failure raised by one of the generator's collaborators.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    TemplatePath(#[from] TemplatePathError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
}
