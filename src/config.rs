use serde::Deserialize;

// =============================================================================
// Fetch-related constants
// =============================================================================

/// Hard timeout for a single source fetch in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 4;

/// Maximum redirects followed when fetching a source
pub const FETCH_REDIRECT_LIMIT: usize = 5;

/// Maximum concurrent source fetches within one update check
pub const FETCH_WORKER_LIMIT: usize = 4;

// =============================================================================
// Validation constants
// =============================================================================

/// Maximum number of top-level keys a source reply may carry
pub const REPLY_KEY_LIMIT: usize = 4;

/// Offset moving derived ids into a band the registry never issues
pub const UPDATE_ID_OFFSET: u64 = 50_000_000;

/// URL token accepted by the fallback update-check detection
pub const UPDATE_CHECK_TOKEN: &str = "update-check";

/// Host-supplied settings for one updater instance
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdaterConfig {
    /// Exact URL of the registry's update-check endpoint
    pub update_check_endpoint: String,
    /// Host frame name accepted by the fallback call-site detection
    #[serde(default = "default_update_orchestrator")]
    pub update_orchestrator: String,
    /// Substring identifying this crate's own outbound calls
    #[serde(default = "default_tls_relax_marker")]
    pub tls_relax_marker: String,
    /// Host action name for single-component metadata queries
    #[serde(default = "default_info_action")]
    pub info_action: String,
}

impl UpdaterConfig {
    /// Settings for the given registry endpoint with default hook names.
    pub fn new(update_check_endpoint: impl Into<String>) -> Self {
        Self {
            update_check_endpoint: update_check_endpoint.into(),
            update_orchestrator: default_update_orchestrator(),
            tls_relax_marker: default_tls_relax_marker(),
            info_action: default_info_action(),
        }
    }
}

fn default_update_orchestrator() -> String {
    "update_components".to_string()
}

fn default_tls_relax_marker() -> String {
    "sideload-updates".to_string()
}

fn default_info_action() -> String {
    "component_information".to_string()
}
