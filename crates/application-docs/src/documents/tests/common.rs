use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::DocumentConfig;
use crate::documents::domain::{
    Application, ApplicationId, ApplicationState, Fund, LegalEntity, Person, Product, Review,
};
use crate::documents::generator::ApplicationDocumentGenerator;
use crate::documents::ports::{
    ApplicationRepository, PdfConverter, PdfDocument, PdfError, PdfOptions, RenderError,
    RepositoryError, TemplatePathError, TemplatePathProvider, ViewRenderer,
};
use crate::documents::view::ApplicationView;

pub(super) const BASE_URI: &str = "https://docs.example.test/";

pub(super) fn document_config() -> DocumentConfig {
    DocumentConfig {
        support_email: "support@bank.test".to_string(),
        signature: "Client Onboarding".to_string(),
        tax_rate: Decimal::new(1, 1),
    }
}

pub(super) fn fund(name: &str, amount: i64, fees: i64) -> Fund {
    Fund {
        name: name.to_string(),
        amount: Decimal::from(amount),
        fees: Decimal::from(fees),
    }
}

pub(super) fn legal_entity() -> LegalEntity {
    LegalEntity {
        registered_name: "Acme Holdings (Pty) Ltd".to_string(),
        registration_number: "2019/123456/07".to_string(),
    }
}

pub(super) fn application(state: ApplicationState) -> Application {
    Application {
        id: ApplicationId::new(),
        reference_number: "APP-000123".to_string(),
        state,
        person: Person {
            first_name: "Thandi".to_string(),
            surname: "Mokoena".to_string(),
        },
        date: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        is_legal_entity: false,
        legal_entity: None,
        products: vec![
            Product {
                name: "Tax Free Savings".to_string(),
                funds: vec![fund("Equity Growth", 100, 10)],
            },
            Product {
                name: "Retirement Annuity".to_string(),
                funds: vec![fund("Balanced", 50, 5)],
            },
        ],
        current_review: None,
    }
}

pub(super) fn in_review(reason: Option<&str>) -> Application {
    let mut application = application(ApplicationState::InReview);
    application.current_review = Some(Review {
        reason: reason.map(str::to_string),
        opened_on: NaiveDate::from_ymd_opt(2025, 3, 20),
    });
    application
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: HashMap<ApplicationId, Application>,
}

impl MemoryRepository {
    pub(super) fn with(applications: impl IntoIterator<Item = Application>) -> Self {
        Self {
            records: applications
                .into_iter()
                .map(|application| (application.id, application))
                .collect(),
        }
    }
}

impl ApplicationRepository for MemoryRepository {
    fn find_application_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.records.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn find_application_by_id(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct HtmlTemplatePaths;

impl TemplatePathProvider for HtmlTemplatePaths {
    fn resolve(&self, template_name: &str) -> Result<String, TemplatePathError> {
        Ok(format!("/templates/{template_name}.html"))
    }
}

pub(super) struct MissingTemplatePaths;

impl TemplatePathProvider for MissingTemplatePaths {
    fn resolve(&self, template_name: &str) -> Result<String, TemplatePathError> {
        Err(TemplatePathError::Unknown(template_name.to_string()))
    }
}

/// Renderer double that records every call and echoes the template path.
#[derive(Default)]
pub(super) struct RecordingRenderer {
    calls: Mutex<Vec<(String, ApplicationView)>>,
    threads: Mutex<Vec<ThreadId>>,
    blank: bool,
}

impl RecordingRenderer {
    pub(super) fn blank() -> Self {
        Self {
            blank: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<(String, ApplicationView)> {
        self.calls.lock().expect("renderer mutex poisoned").clone()
    }

    /// Threads each render ran on, in call order.
    pub(super) fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().expect("renderer mutex poisoned").clone()
    }
}

impl ViewRenderer for RecordingRenderer {
    fn render_from_path(&self, path: &str, view: &ApplicationView) -> Result<String, RenderError> {
        self.calls
            .lock()
            .expect("renderer mutex poisoned")
            .push((path.to_string(), view.clone()));
        self.threads
            .lock()
            .expect("renderer mutex poisoned")
            .push(thread::current().id());
        if self.blank {
            return Ok(String::new());
        }
        Ok(format!(
            "<html><body data-template=\"{path}\">{}</body></html>",
            view.summary().reference_number
        ))
    }
}

pub(super) struct FailingRenderer;

impl ViewRenderer for FailingRenderer {
    fn render_from_path(&self, path: &str, _view: &ApplicationView) -> Result<String, RenderError> {
        Err(RenderError::Template {
            path: path.to_string(),
            reason: "file not found".to_string(),
        })
    }
}

pub(super) struct PanickingRenderer;

impl ViewRenderer for PanickingRenderer {
    fn render_from_path(&self, path: &str, _view: &ApplicationView) -> Result<String, RenderError> {
        panic!("template engine crashed on {path}");
    }
}

/// PDF double that records the html and options it was handed.
#[derive(Default)]
pub(super) struct RecordingPdf {
    calls: Mutex<Vec<(String, PdfOptions)>>,
}

impl RecordingPdf {
    pub(super) fn calls(&self) -> Vec<(String, PdfOptions)> {
        self.calls.lock().expect("pdf mutex poisoned").clone()
    }
}

impl PdfConverter for RecordingPdf {
    fn render_from_html(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, PdfError> {
        self.calls
            .lock()
            .expect("pdf mutex poisoned")
            .push((html.to_string(), options.clone()));
        let mut bytes = b"%PDF-1.7\n".to_vec();
        bytes.extend_from_slice(html.as_bytes());
        Ok(PdfDocument::from_bytes(bytes))
    }
}

pub(super) struct Harness {
    pub(super) generator: ApplicationDocumentGenerator,
    pub(super) renderer: Arc<RecordingRenderer>,
    pub(super) pdf: Arc<RecordingPdf>,
}

pub(super) fn harness(applications: impl IntoIterator<Item = Application>) -> Harness {
    harness_with_renderer(applications, RecordingRenderer::default())
}

pub(super) fn harness_with_renderer(
    applications: impl IntoIterator<Item = Application>,
    renderer: RecordingRenderer,
) -> Harness {
    let renderer = Arc::new(renderer);
    let pdf = Arc::new(RecordingPdf::default());
    let generator = ApplicationDocumentGenerator::new(
        Arc::new(MemoryRepository::with(applications)),
        Arc::new(HtmlTemplatePaths),
        renderer.clone(),
        pdf.clone(),
        document_config(),
    );
    Harness {
        generator,
        renderer,
        pdf,
    }
}

#[derive(Clone, Default)]
pub(super) struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub(super) fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

pub(super) struct CapturedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs `f` with a subscriber that records warnings, returning its result and the log text.
pub(super) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}
