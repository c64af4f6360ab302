//! Shared value types, the error taxonomy and numeric helpers.

/// Dimensions and session time bounds.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
