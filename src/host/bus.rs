//! Hook bus registration
//!
//! The host dispatches named hooks to registered handlers. This crate
//! contributes three filters; each trait method fixes one handler's
//! identity and parameter list, which is what the bus verifies at
//! registration time.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::host::http::{HostResponse, RequestArgs};
use crate::intercept::context::UpdateCheckContext;

/// Filters this crate contributes to the host's hook bus
#[async_trait]
pub trait UpdateFilters: Send + Sync {
    /// Runs after the host receives a response for any outgoing call.
    async fn filter_http_response(
        &self,
        ctx: &UpdateCheckContext,
        response: HostResponse,
    ) -> HostResponse;

    /// Runs before the host sends any outgoing call.
    fn filter_request_args(&self, url: &str, args: RequestArgs) -> RequestArgs;

    /// Runs when the host serves a single component's metadata.
    async fn filter_component_info(
        &self,
        value: Option<Value>,
        action: &str,
        slug: &str,
    ) -> Option<Value>;
}

/// The slice of the host's hook bus this crate registers against
pub trait HookBus {
    /// Installs a filter on the outgoing-response hook.
    fn on_http_response(&mut self, handler: Arc<dyn UpdateFilters>);

    /// Installs a filter on the outgoing-request hook.
    fn on_http_request_args(&mut self, handler: Arc<dyn UpdateFilters>);

    /// Installs a filter on the component-metadata hook.
    fn on_component_info(&mut self, handler: Arc<dyn UpdateFilters>);
}

/// Installs every filter on the host bus.
pub fn register(bus: &mut dyn HookBus, filters: Arc<dyn UpdateFilters>) {
    bus.on_http_response(filters.clone());
    bus.on_http_request_args(filters.clone());
    bus.on_component_info(filters);
}
