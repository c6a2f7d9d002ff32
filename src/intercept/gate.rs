//! Admission rules for intercepted calls

use tracing::debug;

use crate::config::{UPDATE_CHECK_TOKEN, UpdaterConfig};
use crate::host::http::RequestArgs;
use crate::intercept::context::UpdateCheckContext;

/// Whether an intercepted call is the platform's genuine update check.
///
/// The exact endpoint match is the primary path. The fallback exists so a
/// registry-side URL change does not silently break augmentation: it
/// requires both the `update-check` token in the URL and the platform's
/// update orchestrator among the host call frames, so it never fires for
/// unrelated calls that merely carry the token.
pub fn is_genuine_update_check(ctx: &UpdateCheckContext, config: &UpdaterConfig) -> bool {
    if ctx.url == config.update_check_endpoint {
        return true;
    }

    if !ctx.url.to_ascii_lowercase().contains(UPDATE_CHECK_TOKEN) {
        return false;
    }

    let from_orchestrator = ctx
        .backtrace
        .iter()
        .any(|frame| frame == &config.update_orchestrator);
    if !from_orchestrator {
        debug!(
            "update-check token in {} outside the update flow, passing through",
            ctx.url
        );
    }
    from_orchestrator
}

/// Disables TLS verification for this crate's own outbound calls.
///
/// Third-party sources sit on plugin-author infrastructure where
/// self-signed or shared-hosting certificates are common; every other
/// outgoing call keeps its verification untouched.
pub fn relax_tls_for_own_calls(url: &str, mut args: RequestArgs, marker: &str) -> RequestArgs {
    if url.contains(marker) {
        args.tls_verify = false;
    }
    args
}
