//! Room Gateway Service Library
//!
//! A small HTTP gateway in front of a LiveKit deployment:
//!
//! - Room access tokens (HS256 JWTs with a `video` grant): issue and verify
//! - Chat replies from Gemini or a rule-based fallback
//! - Optional speech-to-text for audio prompts
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> crypto/
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `crypto` - Token claims, signing and validation
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Request and response bodies
//! - `observability` - Prometheus metrics and log-safe hashing
//! - `routes` - Axum router setup
//! - `services` - Token codec, chat responders, transcription client

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
