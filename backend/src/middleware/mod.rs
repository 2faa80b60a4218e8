//! Request middleware.
//!
//! Holds the request-scoped trace identifier middleware shared by every
//! HTTP route.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, Trace, TraceId};
