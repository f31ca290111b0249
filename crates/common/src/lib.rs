//! Common utilities and types shared across Room Gateway crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for compact JWT helpers (size limits, segment inspection)
pub mod jwt;
