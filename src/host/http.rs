//! HTTP value types the host hands to filters

/// Response shape the host's HTTP layer passes to response filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResponse {
    /// HTTP status reported by the host client
    pub status: u16,
    /// Raw response body; absent when the host could not read one
    pub body: Option<Vec<u8>>,
}

impl HostResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    /// Response carrying no body at all.
    pub fn without_body(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Outgoing-request arguments the host lets filters adjust before sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestArgs {
    /// Whether the host client verifies TLS certificates on this call
    pub tls_verify: bool,
}

impl Default for RequestArgs {
    fn default() -> Self {
        Self { tls_verify: true }
    }
}
