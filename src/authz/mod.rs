//! Authorization checks and relationship queries.
//!
//! - [`Client::check`](crate::Client::check) and friends decide a single
//!   question ("may alice view report q3?")
//! - [`Client::query`](crate::Client::query) lists what is related to what
//! - [`Authorizer`] abstracts the check call for middleware and tests

mod authorizer;
pub(crate) mod check;
pub(crate) mod query;

pub use authorizer::Authorizer;
pub use check::{AUTHORIZED, CheckOp, CheckRequest, CheckResult, WarrantCheck};
pub use query::{Query, QueryRequest, QueryResult};
