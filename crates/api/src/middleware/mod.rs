//! Request-level middleware.
//!
//! - [`gate`] -- path exemptions and credential enforcement.

pub mod gate;
