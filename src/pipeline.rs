//! Composition of the gate, resolver, and merger behind the host's hooks
//!
//! One [`Updater`] lives for the host process. Each admitted update check
//! runs one short cycle through it: admit, resolve every component's
//! source, merge, return the augmented response. Nothing in the cycle is
//! fatal; every failure path hands the host back exactly what it gave us.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{FETCH_WORKER_LIMIT, UpdaterConfig};
use crate::host::bus::UpdateFilters;
use crate::host::components::{ComponentProvider, InstalledComponent};
use crate::host::http::{HostResponse, RequestArgs};
use crate::intercept::context::UpdateCheckContext;
use crate::intercept::gate;
use crate::merge::merge_update_body;
use crate::source::error::FetchError;
use crate::source::record::UpdateRecord;
use crate::source::registry::SourceRegistry;
use crate::source::remote::{HttpTransport, SourceTransport};
use crate::source::resolver::{Cycle, SourceResolver};

/// The update pipeline, installed on the host bus as a set of filters
pub struct Updater {
    config: UpdaterConfig,
    components: Arc<dyn ComponentProvider>,
    resolver: SourceResolver,
    /// Set while resolver traffic is in flight. The response filter treats
    /// every intercepted call as unrelated until it clears, so the
    /// resolver's own fetches can never re-enter the pipeline.
    resolving: AtomicBool,
}

impl Updater {
    pub fn new(
        config: UpdaterConfig,
        components: Arc<dyn ComponentProvider>,
        sources: SourceRegistry,
        transport: Arc<dyn SourceTransport>,
    ) -> Self {
        Self {
            config,
            components,
            resolver: SourceResolver::new(sources, transport),
            resolving: AtomicBool::new(false),
        }
    }

    /// Updater with the stock HTTP transport.
    pub fn with_http_transport(
        config: UpdaterConfig,
        components: Arc<dyn ComponentProvider>,
        sources: SourceRegistry,
    ) -> Result<Self, FetchError> {
        Ok(Self::new(
            config,
            components,
            sources,
            Arc::new(HttpTransport::new()?),
        ))
    }

    /// Resolves every distinct slug concurrently, then maps the outcomes
    /// back to files in component order.
    ///
    /// The recursion guard is held from before the first fetch until after
    /// the last one in the cycle completes.
    async fn resolve_components(
        &self,
        cycle: &Cycle,
        components: &[InstalledComponent],
    ) -> IndexMap<String, Arc<UpdateRecord>> {
        let _guard = ResolveGuard::hold(&self.resolving);

        let mut slugs: Vec<String> = Vec::new();
        for component in components {
            let slug = component.slug();
            if !slugs.contains(&slug) {
                slugs.push(slug);
            }
        }

        stream::iter(&slugs)
            .for_each_concurrent(FETCH_WORKER_LIMIT, |slug| async move {
                self.resolver.resolve(cycle, slug).await;
            })
            .await;

        let mut records = IndexMap::new();
        for component in components {
            // Memoized above, so this never touches the network
            if let Some(record) = self.resolver.resolve(cycle, &component.slug()).await {
                records.insert(component.file.clone(), record);
            }
        }
        records
    }
}

#[async_trait]
impl UpdateFilters for Updater {
    async fn filter_http_response(
        &self,
        ctx: &UpdateCheckContext,
        response: HostResponse,
    ) -> HostResponse {
        if self.resolving.load(Ordering::SeqCst) {
            return response;
        }

        let Some(registry_body) = response.body.as_deref() else {
            return response;
        };

        if !gate::is_genuine_update_check(ctx, &self.config) {
            return response;
        }

        debug!("augmenting update check for {}", ctx.url);
        let components = self.components.installed_components();
        let cycle = Cycle::new();
        let records = self.resolve_components(&cycle, &components).await;
        if records.is_empty() {
            return response;
        }

        match merge_update_body(registry_body, &components, &records) {
            Ok(merged) => HostResponse {
                body: Some(merged),
                ..response
            },
            Err(e) => {
                warn!("failed to merge update records: {}", e);
                response
            }
        }
    }

    fn filter_request_args(&self, url: &str, args: RequestArgs) -> RequestArgs {
        gate::relax_tls_for_own_calls(url, args, &self.config.tls_relax_marker)
    }

    async fn filter_component_info(
        &self,
        value: Option<Value>,
        action: &str,
        slug: &str,
    ) -> Option<Value> {
        // The host already has an answer, keep it
        if value.is_some() {
            return value;
        }
        if action != self.config.info_action || slug.is_empty() {
            return None;
        }

        let cycle = Cycle::new();
        let record = {
            let _guard = ResolveGuard::hold(&self.resolving);
            self.resolver.resolve(&cycle, slug).await
        };
        record.map(|record| Value::Object(record.info.clone()))
    }
}

/// Clears the resolving flag when the cycle's fetch phase ends
struct ResolveGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ResolveGuard<'a> {
    fn hold(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for ResolveGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
