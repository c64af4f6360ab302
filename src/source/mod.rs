//! Image source collaborators.

/// Filesystem image sequences.
pub mod files;
/// In-memory rasters.
pub mod memory;
/// Image source trait and scoped raster loans.
pub mod provider;
