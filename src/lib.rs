//! Update checks for components distributed outside the official registry
//!
//! The host platform periodically asks its registry which installed
//! components have new versions. This crate hooks that check and folds in
//! metadata for components the registry does not know about, fetched from
//! a URL each component registers for itself. The host's own installer
//! consumes the merged answer; nothing here downloads or installs.
//!
//! ```text
//! ┌───────────┐     ┌───────────┐     ┌───────────┐
//! │ intercept │────▶│  source   │────▶│   merge   │
//! │ (admit?)  │     │ (resolve) │     │  (fold)   │
//! └───────────┘     └───────────┘     └───────────┘
//!       ▲                                   │
//!       └────────── host hook bus ◀─────────┘
//! ```
//!
//! # Modules
//!
//! - [`intercept`]: decides whether an intercepted call is the genuine
//!   update check and relaxes TLS for this crate's own traffic
//! - [`source`]: per-component fetch, schema validation, id derivation,
//!   and metadata sanitization, memoized per check cycle
//! - [`merge`]: folds validated records into the registry body without
//!   overriding official entries
//! - [`host`]: traits and value types the host platform provides
//! - [`pipeline`]: the [`pipeline::Updater`] wiring everything behind the
//!   host bus
//! - [`config`]: fetch bounds and host-supplied settings

pub mod config;
pub mod host;
pub mod intercept;
pub mod merge;
pub mod pipeline;
pub mod source;
