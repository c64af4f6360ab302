//! Frame accumulation for one render session.

/// Frame, frame sequence and accumulator.
pub mod accumulator;
