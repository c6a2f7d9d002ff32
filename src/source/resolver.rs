//! Cycle-scoped source resolution

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Url;
use tracing::{debug, warn};

use crate::source::record::{UpdateRecord, parse_reply};
use crate::source::registry::SourceRegistry;
use crate::source::remote::SourceTransport;

/// Scratch state for one update-check cycle.
///
/// Memoizes every resolution outcome by slug; `None` is a cached negative,
/// so a failing source is contacted at most once per cycle. Dropped when
/// the cycle ends, and a fresh cycle always re-attempts every source.
#[derive(Default)]
pub struct Cycle {
    outcomes: Mutex<HashMap<String, Option<Arc<UpdateRecord>>>>,
}

impl Cycle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Option<Arc<UpdateRecord>>>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, slug: &str) -> Option<Option<Arc<UpdateRecord>>> {
        self.lock().get(slug).cloned()
    }

    fn store(&self, slug: &str, outcome: Option<Arc<UpdateRecord>>) {
        self.lock().insert(slug.to_string(), outcome);
    }
}

/// Resolves component slugs against their registered update sources
pub struct SourceResolver {
    sources: SourceRegistry,
    transport: Arc<dyn SourceTransport>,
}

impl SourceResolver {
    pub fn new(sources: SourceRegistry, transport: Arc<dyn SourceTransport>) -> Self {
        Self { sources, transport }
    }

    /// Resolves one slug, consulting and filling the cycle memo.
    ///
    /// Never fails outward: every transport or validation problem degrades
    /// to `None`, and the negative outcome is memoized for the rest of the
    /// cycle.
    pub async fn resolve(&self, cycle: &Cycle, slug: &str) -> Option<Arc<UpdateRecord>> {
        if let Some(outcome) = cycle.lookup(slug) {
            debug!("resolution for {} served from cycle memo", slug);
            return outcome;
        }

        let outcome = self.resolve_uncached(slug).await;
        cycle.store(slug, outcome.clone());
        outcome
    }

    async fn resolve_uncached(&self, slug: &str) -> Option<Arc<UpdateRecord>> {
        let Some(source) = self.sources.get(slug) else {
            debug!("no update source registered for {}", slug);
            return None;
        };

        let declared = source.update_url();
        let url = match Url::parse(&declared) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                warn!("source for {} declared an invalid update URL: {}", slug, declared);
                return None;
            }
        };

        let body = match self.transport.post_empty(&url).await {
            Ok(body) => body,
            Err(e) => {
                debug!("source fetch for {} failed: {}", slug, e);
                return None;
            }
        };

        match parse_reply(slug, &body) {
            Ok(record) => Some(Arc::new(record)),
            Err(e) => {
                warn!("source reply for {} rejected: {}", slug, e);
                None
            }
        }
    }
}
