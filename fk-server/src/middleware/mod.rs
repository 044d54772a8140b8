//! FormKey service middleware.
//!
//! # Metrics
//!
//! The metrics middleware counts API requests per route pattern and status. Route patterns are
//! used instead of request paths so that form keys never end up in label values.

pub mod metrics;
