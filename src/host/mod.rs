//! Interfaces to the host platform
//!
//! The hook bus, component enumeration, and the HTTP value types seen by
//! filters are all owned by the surrounding platform. This module pins down
//! the slice of each that the update pipeline needs, as traits the host
//! implements and plain value types it hands across.

pub mod bus;
pub mod components;
pub mod http;
