//! Utility functions shared by the projectors.
//!
//! - **Timestamps**: the "first set of A, B" fallback chain used by every
//!   format, rendered as RFC 3339, RFC 1123Z, or a bare date

mod time;

pub use time::{any_time_format, TimeFormat};
