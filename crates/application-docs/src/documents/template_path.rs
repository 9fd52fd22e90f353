use std::sync::Arc;

use super::ports::{TemplatePathError, TemplatePathProvider};
use super::view::DocumentTemplate;

const SEPARATOR: char = '/';

/// Strips one trailing character when the base URI ends with a path separator.
pub fn normalize_base_uri(base_uri: &str) -> &str {
    if base_uri.ends_with(SEPARATOR) {
        &base_uri[..base_uri.len() - SEPARATOR.len_utf8()]
    } else {
        base_uri
    }
}

/// Joins a normalized base URI with the path the provider resolves for a template.
#[derive(Clone)]
pub struct TemplateLocator {
    provider: Arc<dyn TemplatePathProvider>,
}

impl TemplateLocator {
    pub fn new(provider: Arc<dyn TemplatePathProvider>) -> Self {
        Self { provider }
    }

    pub fn locate(
        &self,
        base_uri: &str,
        template: DocumentTemplate,
    ) -> Result<String, TemplatePathError> {
        let path = self.provider.resolve(template.name())?;
        Ok(format!("{}{}", normalize_base_uri(base_uri), path))
    }
}
