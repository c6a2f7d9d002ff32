//! Interception gate
//!
//! Decides whether an intercepted outgoing call is the one update check
//! worth augmenting, and relaxes TLS verification for this crate's own
//! remote traffic. Everything here is a pure decision over the
//! [`context::UpdateCheckContext`] the host supplies; the recursion guard
//! that rejects the resolver's own nested calls lives on the pipeline.

pub mod context;
pub mod gate;
