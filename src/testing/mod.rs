//! Testing utilities.
//!
//! [`MockClient`] implements [`Authorizer`](crate::Authorizer), so code that
//! takes an authorizer (including the middleware) can be tested without a
//! server.
//!
//! ```rust
//! use warrant::testing::MockClient;
//! use warrant::{Authorizer, Subject, WarrantCheck};
//!
//! async fn can_edit(authz: &dyn Authorizer, user: &str) -> bool {
//!     let check = WarrantCheck::new("doc", "1", "editor", Subject::new("user", user));
//!     authz.is_authorized(check).await.unwrap_or(false)
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mock = MockClient::new().expect_check(
//!     WarrantCheck::new("doc", "1", "editor", Subject::new("user", "alice")),
//!     true,
//! );
//! assert!(can_edit(&mock, "alice").await);
//! assert!(!can_edit(&mock, "bob").await);
//! mock.verify();
//! # }
//! ```

mod mock_client;

pub use mock_client::MockClient;
