//! Raster model and per-pixel conversion to RGBA8.

/// Per-pixel float to RGBA8 conversion.
pub mod convert;
/// Sample format and channel packing descriptors.
pub mod format;
/// Owned raster buffers.
#[allow(clippy::module_inception)]
pub mod raster;
