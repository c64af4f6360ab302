use crate::foundation::core::Dimensions;

/// Convenience result type used across copgif.
pub type CopGifResult<T> = Result<T, CopGifError>;

/// Error taxonomy surfaced by the capture pipeline.
///
/// Every variant aborts the current render session. Retrying is the caller's job.
#[derive(thiserror::Error, Debug)]
pub enum CopGifError {
    /// The configured source path does not name an image-bearing node.
    #[error("invalid source path: {0}")]
    InvalidPath(String),

    /// The image source could not resolve a raster for the requested path/plane/time.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// A resolved raster reports itself as not usable.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// Raster sample storage is not one of the supported floating-point encodings.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// The first accepted raster has a zero width or height.
    #[error("degenerate dimensions: {}x{}", .0.width, .0.height)]
    DegenerateDimensions(Dimensions),

    /// A later raster does not match the dimensions locked by the first frame.
    #[error(
        "dimension mismatch: got {}x{}, expected {}x{}",
        actual.width,
        actual.height,
        expected.width,
        expected.height
    )]
    DimensionMismatch {
        /// Dimensions locked by the first accepted frame.
        expected: Dimensions,
        /// Dimensions of the rejected raster.
        actual: Dimensions,
    },

    /// No usable output path is configured at finalize time.
    #[error("output unconfigured: {0}")]
    OutputUnconfigured(String),

    /// The encoder could not open, write or close the output artifact.
    #[error("encoder failure: {0}")]
    Encoder(String),

    /// A pre-frame hook asked for the session to stop.
    #[error("render aborted: {0}")]
    Aborted(String),

    /// A lifecycle operation was called in a state that does not allow it.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// A session or frame hook failed.
    #[error("hook error: {0}")]
    Hook(String),

    /// Finalize was reached without a single captured frame.
    #[error("empty sequence: {0}")]
    EmptySequence(String),

    /// Invalid user-provided configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CopGifError {
    /// Build a [`CopGifError::InvalidPath`] value.
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Build a [`CopGifError::SourceNotFound`] value.
    pub fn source_not_found(msg: impl Into<String>) -> Self {
        Self::SourceNotFound(msg.into())
    }

    /// Build a [`CopGifError::InvalidRaster`] value.
    pub fn invalid_raster(msg: impl Into<String>) -> Self {
        Self::InvalidRaster(msg.into())
    }

    /// Build a [`CopGifError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`CopGifError::OutputUnconfigured`] value.
    pub fn output_unconfigured(msg: impl Into<String>) -> Self {
        Self::OutputUnconfigured(msg.into())
    }

    /// Build a [`CopGifError::Encoder`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    /// Build a [`CopGifError::Aborted`] value.
    pub fn aborted(msg: impl Into<String>) -> Self {
        Self::Aborted(msg.into())
    }

    /// Build a [`CopGifError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a [`CopGifError::Hook`] value.
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// Build a [`CopGifError::EmptySequence`] value.
    pub fn empty_sequence(msg: impl Into<String>) -> Self {
        Self::EmptySequence(msg.into())
    }

    /// Build a [`CopGifError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
