//! Render session lifecycle.

/// Render configuration.
pub mod config;
/// Render lifecycle controller.
pub mod controller;
/// Session and frame hooks.
pub mod hooks;
