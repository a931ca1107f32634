//! Integration tests for the Warrant Rust SDK.
//!
//! Every test runs against [`common::FakeWarrant`], an in-memory stand-in
//! for the service mounted on a `wiremock` server, so no network access or
//! credentials are needed.
//!
//! ```bash
//! cargo test --test integration
//! ```

mod check_tests;
mod common;
#[cfg(feature = "middleware")]
mod middleware_tests;
mod objects_tests;
mod relationships_tests;
