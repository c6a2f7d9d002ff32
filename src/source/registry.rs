//! Explicit registry of component update sources

use std::collections::HashMap;

/// A component's externally hosted update endpoint.
///
/// Components opt in by registering a source under their slug at load
/// time; a plain closure returning the URL is enough.
pub trait UpdateSource: Send + Sync {
    /// URL serving this component's version-check replies
    fn update_url(&self) -> String;
}

impl<F> UpdateSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn update_url(&self) -> String {
        self()
    }
}

/// Slug-keyed collection of registered update sources
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Box<dyn UpdateSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` for `slug`, replacing any earlier registration.
    pub fn register(&mut self, slug: impl Into<String>, source: impl UpdateSource + 'static) {
        self.sources.insert(slug.into(), Box::new(source));
    }

    pub fn get(&self, slug: &str) -> Option<&dyn UpdateSource> {
        self.sources.get(slug).map(Box::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
