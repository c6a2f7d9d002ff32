//! Context for one intercepted outgoing call

/// Everything the host exposes about one intercepted outgoing call.
///
/// Transient: the host builds one per response-filter invocation and it is
/// dropped when the filter returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCheckContext {
    /// Target URL of the outgoing call
    pub url: String,
    /// Host call frames active when the call was made, innermost first.
    ///
    /// Only consulted by the fallback call-site check. Hosts that cannot
    /// produce frames leave this empty and rely on the exact endpoint
    /// match.
    pub backtrace: Vec<String>,
}

impl UpdateCheckContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            backtrace: Vec::new(),
        }
    }

    /// Same context with the host's call frames attached.
    pub fn with_backtrace(mut self, frames: Vec<String>) -> Self {
        self.backtrace = frames;
        self
    }
}
