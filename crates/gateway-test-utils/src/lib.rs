//! # Gateway Test Utilities
//!
//! Shared test utilities for the room gateway.
//!
//! This crate provides:
//! - Server test harness (`TestGatewayServer` for E2E tests)
//! - Mock chat responder and transcriber
//! - Token fixtures signed with known credentials and chosen timestamps
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gateway_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let server = TestGatewayServer::builder().with_livekit().spawn().await?;
//!
//!     let response = reqwest::get(format!("{}/health", server.url())).await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod mocks;
pub mod server_harness;
pub mod token_fixtures;

// Re-export commonly used items
pub use mocks::*;
pub use server_harness::*;
pub use token_fixtures::*;
