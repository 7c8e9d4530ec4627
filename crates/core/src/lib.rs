//! Domain logic for the gatehouse authentication service.
//!
//! This crate has no internal dependencies and holds the pieces that are
//! meaningful without a database or an HTTP stack: the error taxonomy,
//! shared type aliases, the session registry state machine, and the
//! log-redaction helper.

pub mod error;
pub mod redact;
pub mod session;
pub mod types;
