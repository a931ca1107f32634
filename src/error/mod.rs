//! Error types for the Warrant SDK.
//!
//! All operations return [`Error`], a single value type distinguished by its
//! [`ErrorKind`]:
//!
//! - payload serialization failures ([`ErrorKind::InvalidPayload`])
//! - request construction failures ([`ErrorKind::RequestConstruction`])
//! - network failures ([`ErrorKind::Transport`])
//! - non-success HTTP statuses ([`ErrorKind::Api`]), with status code and raw body
//! - undecodable responses ([`ErrorKind::InvalidResponse`])
//! - setup mistakes ([`ErrorKind::Configuration`])
//!
//! ## Key Invariant
//!
//! An authorization check that comes back "not authorized" is `Ok(false)`,
//! never `Err`. Errors are reserved for failures to obtain a decision.

mod core;
mod kind;

pub use core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for Warrant operations.
pub type Result<T> = std::result::Result<T, Error>;
