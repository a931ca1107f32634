//! Core types for the Warrant SDK.
//!
//! - [`Object`]: the uniform object every resource is stored as
//! - [`Warrant`]: a relationship tuple (object, relation, subject)
//! - [`PolicyContext`]: check-time bindings for warrant policies
//! - [`WarrantToken`]: consistency token for read-after-write
//! - [`ListResult`]: a cursor-paginated page

mod consistency;
mod context;
pub(crate) mod object;
pub(crate) mod page;
mod warrant;

pub use consistency::{RequestOptions, WarrantToken};
pub use context::PolicyContext;
pub use object::{Meta, Object, ObjectRef};
pub use page::{ListParams, ListResult, SortOrder};
pub use warrant::{Subject, Warrant};
