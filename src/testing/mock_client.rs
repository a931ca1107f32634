//! MockClient for testing with expectations.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::authz::{Authorizer, WarrantCheck};
use crate::Error;

/// A mock [`Authorizer`] for testing.
///
/// Checks are matched on the tuple (object, relation, subject); policy
/// context is recorded but not matched. Unmatched checks fall back to the
/// default decision, which is deny unless built with
/// [`allow_all`](Self::allow_all).
///
/// ## Example
///
/// ```rust
/// use warrant::testing::MockClient;
/// use warrant::{Subject, WarrantCheck};
///
/// let alice_views = WarrantCheck::new("doc", "1", "viewer", Subject::new("user", "alice"));
/// let bob_edits = WarrantCheck::new("doc", "1", "editor", Subject::new("user", "bob"));
///
/// let mock = MockClient::new()
///     .expect_check(alice_views, true)
///     .expect_check(bob_edits, false);
///
/// // Hand `mock` to the code under test, then:
/// // mock.verify();
/// ```
#[derive(Clone, Default)]
pub struct MockClient {
    expectations: Arc<Mutex<Vec<Expectation>>>,
    calls: Arc<Mutex<Vec<WarrantCheck>>>,
    default_allow: bool,
}

#[derive(Debug, Clone)]
struct Expectation {
    check: WarrantCheck,
    outcome: Outcome,
}

#[derive(Debug, Clone)]
enum Outcome {
    Decision(bool),
    Fail(String),
}

fn same_tuple(a: &WarrantCheck, b: &WarrantCheck) -> bool {
    a.object_type == b.object_type
        && a.object_id == b.object_id
        && a.relation == b.relation
        && a.subject == b.subject
}

impl MockClient {
    /// Creates a mock that denies unmatched checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that allows unmatched checks.
    pub fn allow_all() -> Self {
        Self {
            default_allow: true,
            ..Self::new()
        }
    }

    /// Creates a mock that denies unmatched checks.
    pub fn deny_all() -> Self {
        Self::new()
    }

    /// Answers `check` with `result`.
    #[must_use]
    pub fn expect_check(self, check: WarrantCheck, result: bool) -> Self {
        self.push(check, Outcome::Decision(result));
        self
    }

    /// Answers `check` with a transport error.
    #[must_use]
    pub fn fail_check(self, check: WarrantCheck, message: impl Into<String>) -> Self {
        self.push(check, Outcome::Fail(message.into()));
        self
    }

    fn push(&self, check: WarrantCheck, outcome: Outcome) {
        self.expectations.lock().push(Expectation { check, outcome });
    }

    /// Verifies that every expected check was made at least once.
    ///
    /// # Panics
    ///
    /// Panics naming the first expectation that was never called.
    #[allow(clippy::panic)]
    pub fn verify(&self) {
        let expectations = self.expectations.lock();
        let calls = self.calls.lock();

        for expectation in expectations.iter() {
            if !calls.iter().any(|c| same_tuple(c, &expectation.check)) {
                panic!("Expected check {} was never called", expectation.check);
            }
        }
    }

    /// Returns the number of checks made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the checks made, in order.
    pub fn calls(&self) -> Vec<WarrantCheck> {
        self.calls.lock().clone()
    }

    /// Clears all expectations and recorded calls.
    pub fn reset(&self) {
        self.expectations.lock().clear();
        self.calls.lock().clear();
    }

    fn answer(&self, check: &WarrantCheck) -> Result<bool, Error> {
        let expectations = self.expectations.lock();
        match expectations.iter().find(|e| same_tuple(&e.check, check)) {
            Some(Expectation {
                outcome: Outcome::Decision(result),
                ..
            }) => Ok(*result),
            Some(Expectation {
                outcome: Outcome::Fail(message),
                ..
            }) => Err(Error::transport(message.clone())),
            None => Ok(self.default_allow),
        }
    }
}

impl std::fmt::Debug for MockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClient")
            .field("expectations", &self.expectations.lock().len())
            .field("calls", &self.call_count())
            .field("default_allow", &self.default_allow)
            .finish()
    }
}

impl Authorizer for MockClient {
    fn is_authorized(
        &self,
        check: WarrantCheck,
    ) -> Pin<Box<dyn Future<Output = Result<bool, Error>> + Send + '_>> {
        let result = self.answer(&check);
        self.calls.lock().push(check);
        Box::pin(async move { result })
    }
}
