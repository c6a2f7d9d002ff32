//! Source resolution layer
//!
//! Resolves an installed component's third-party update source into a
//! validated record: registry lookup, one bounded POST, schema validation,
//! id derivation, and metadata sanitization, memoized per update-check
//! cycle.
//!
//! # Modules
//!
//! - [`registry`]: explicit slug → [`registry::UpdateSource`] registrations
//! - [`remote`]: the transport used to call sources
//! - [`record`]: reply validation and the [`record::UpdateRecord`] type
//! - [`resolver`]: cycle-scoped resolution with negative caching
//! - [`error`]: fetch and validation error types

pub mod error;
pub mod record;
pub mod registry;
pub mod remote;
pub mod resolver;
