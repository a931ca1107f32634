//! # Warrant Rust SDK
//!
//! Typed client for the Warrant authorization service: objects and object
//! types, warrants (relationship tuples), authorization checks, relationship
//! queries, RBAC and pricing-tier helpers, sessions, and a tower middleware
//! that gates HTTP routes on a check.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warrant::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> warrant::Result<()> {
//!     let client = Client::builder().api_key("my_api_key").build()?;
//!
//!     // document:readme#viewer@user:alice
//!     let warrant = client
//!         .warrants()
//!         .create(
//!             WarrantParams::builder()
//!                 .object_type("document")
//!                 .object_id("readme")
//!                 .relation("viewer")
//!                 .subject(Subject::new("user", "alice"))
//!                 .build(),
//!         )
//!         .await?;
//!
//!     // Read our own write.
//!     let token = warrant.warrant_token.unwrap_or_else(WarrantToken::latest);
//!     let allowed = client
//!         .check(WarrantCheck::new("document", "readme", "viewer", Subject::new("user", "alice")))
//!         .warrant_token(token)
//!         .await?;
//!     println!("allowed: {}", allowed);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Warrant order**: `object#relation@subject`, e.g.
//!   `role:admin#member@user:alice`.
//! - **Denial is not an error**: checks return `Ok(false)` when access is
//!   denied; `Err` means the check could not be made.
//! - **Consistency**: writes return a [`WarrantToken`]. Pass it to a read, or
//!   use `.latest()`, to read that write back.
//! - **Configuration is immutable**: build a [`Client`] once and clone it.
//!   [`client::set_default`] stores a process-wide client for code that
//!   cannot thread one through.
//!
//! ## Features
//!
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)
//! - `middleware` (default): tower/axum route gating in [`middleware`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod authz;
pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod types;
pub mod user_agent;

// Test doubles
pub mod testing;

#[cfg(feature = "middleware")]
#[cfg_attr(docsrs, doc(cfg(feature = "middleware")))]
pub mod middleware;

pub mod prelude;

pub use authz::{
    AUTHORIZED, Authorizer, CheckOp, CheckRequest, CheckResult, Query, QueryRequest, QueryResult,
    WarrantCheck,
};
pub use client::{Client, ClientBuilder};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use types::{
    ListParams, ListResult, Meta, Object, ObjectRef, PolicyContext, RequestOptions, SortOrder,
    Subject, Warrant, WarrantToken,
};

#[cfg(feature = "middleware")]
pub use middleware::{AuthorizeLayer, EnsureHasPermission, EnsureIsAuthorized};
