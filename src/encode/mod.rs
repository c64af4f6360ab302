//! Animated-image encoders.
//!
//! Encoders consume a finished frame sequence in capture order.

/// Encoder trait and configuration.
pub mod encoder;
/// GIF file output.
pub mod gif;
/// Recording encoder for tests and debugging.
pub mod memory;
