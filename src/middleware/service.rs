//! Layer and service for the authorization gate.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::Response;
use http::Request;
use tower::{Layer, Service};

use super::Gate;

/// Layer produced by [`EnsureIsAuthorized`](super::EnsureIsAuthorized) and
/// [`EnsureHasPermission`](super::EnsureHasPermission).
#[derive(Clone)]
pub struct AuthorizeLayer {
    gate: Arc<Gate>,
}

impl AuthorizeLayer {
    pub(crate) fn new(gate: Gate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> &Gate {
        &self.gate
    }
}

impl std::fmt::Debug for AuthorizeLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizeLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for AuthorizeLayer {
    type Service = AuthorizeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthorizeService {
            inner,
            gate: self.gate.clone(),
        }
    }
}

/// Service that runs one check per request before calling the inner service.
#[derive(Clone)]
pub struct AuthorizeService<S> {
    inner: S,
    gate: Arc<Gate>,
}

impl<S> std::fmt::Debug for AuthorizeService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizeService").finish_non_exhaustive()
    }
}

impl<S> Service<Request<Body>> for AuthorizeService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        // Take the service that was driven to readiness; leave a fresh clone.
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            let Some(check) = gate.check_for(&request) else {
                tracing::warn!(
                    method = %request.method(),
                    path = request.uri().path(),
                    "could not resolve ids for authorization check, denying"
                );
                return Ok(gate.deny());
            };

            match gate.authorizer().is_authorized(check.clone()).await {
                Ok(true) => ready_inner.call(request).await,
                Ok(false) => {
                    tracing::debug!(check = %check, "authorization denied");
                    Ok(gate.deny())
                }
                Err(err) => {
                    tracing::warn!(check = %check, error = %err, "authorization check failed, denying");
                    Ok(gate.deny())
                }
            }
        })
    }
}
