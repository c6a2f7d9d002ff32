//! Host fakes shared by the end-to-end tests

use std::sync::Arc;

use sideload_updates::host::bus::{HookBus, UpdateFilters};
use sideload_updates::host::components::{ComponentProvider, InstalledComponent};

/// Component provider with a fixed install list
pub struct StaticComponents(pub Vec<InstalledComponent>);

impl ComponentProvider for StaticComponents {
    fn installed_components(&self) -> Vec<InstalledComponent> {
        self.0.clone()
    }
}

/// Hook bus that hands the registered filters back to the test
#[derive(Default)]
pub struct FilterBus {
    pub http_response: Option<Arc<dyn UpdateFilters>>,
    pub http_request_args: Option<Arc<dyn UpdateFilters>>,
    pub component_info: Option<Arc<dyn UpdateFilters>>,
}

impl HookBus for FilterBus {
    fn on_http_response(&mut self, handler: Arc<dyn UpdateFilters>) {
        self.http_response = Some(handler);
    }

    fn on_http_request_args(&mut self, handler: Arc<dyn UpdateFilters>) {
        self.http_request_args = Some(handler);
    }

    fn on_component_info(&mut self, handler: Arc<dyn UpdateFilters>) {
        self.component_info = Some(handler);
    }
}
