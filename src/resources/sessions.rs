//! Sessions: short-lived tokens for client-side checks and links into the
//! self-service dashboard.

use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::Client;
use crate::client::inner::Endpoint;
use crate::types::object::require_non_empty;
use crate::types::RequestOptions;
use crate::Error;

const SESSIONS_PATH: &str = "/v1/sessions";

/// Parameters for an authorization session.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct AuthorizationSessionParams {
    /// The user the session is issued for.
    #[builder(into)]
    pub user_id: String,
    /// Scopes the session to a tenant.
    #[builder(into)]
    pub tenant_id: Option<String>,
    /// Session lifetime; the service default applies when absent.
    pub ttl: Option<Duration>,
}

/// Which dashboard the self-service session opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfServiceStrategy {
    /// Fine-grained access control.
    Fgac,
    /// Role-based access control.
    Rbac,
}

/// Parameters for a self-service dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct SelfServiceSessionParams {
    /// The user the session is issued for.
    #[builder(into)]
    pub user_id: String,
    /// The tenant the user manages.
    #[builder(into)]
    pub tenant_id: String,
    /// Where the dashboard sends the user back to.
    #[builder(into)]
    pub redirect_url: String,
    /// Which dashboard to open.
    pub strategy: SelfServiceStrategy,
    /// Session lifetime; the service default applies when absent.
    pub ttl: Option<Duration>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody<'a> {
    #[serde(rename = "type")]
    session_type: &'static str,
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    self_service_strategy: Option<SelfServiceStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u64>,
}

#[derive(Deserialize)]
struct SessionResponse {
    token: String,
}

/// Client for sessions.
///
/// Access via `client.sessions()`. Sessions hold no local state; each call
/// issues a new token.
///
/// ```rust,no_run
/// use warrant::resources::{SelfServiceSessionParams, SelfServiceStrategy};
///
/// # async fn example(client: warrant::Client) -> Result<(), warrant::Error> {
/// let url = client
///     .sessions()
///     .create_self_service_session(
///         SelfServiceSessionParams::builder()
///             .user_id("alice")
///             .tenant_id("acme")
///             .redirect_url("https://app.example.com/settings")
///             .strategy(SelfServiceStrategy::Rbac)
///             .build(),
///     )
///     .await?;
/// println!("manage your team at {}", url);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionsClient {
    client: Client,
}

impl SessionsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates an authorization session and returns its token.
    pub async fn create_authorization_session(
        &self,
        params: AuthorizationSessionParams,
    ) -> Result<String, Error> {
        require_non_empty("user id", &params.user_id)?;
        let body = SessionBody {
            session_type: "sess",
            user_id: &params.user_id,
            tenant_id: params.tenant_id.as_deref(),
            self_service_strategy: None,
            ttl: params.ttl.map(|ttl| ttl.as_secs()),
        };
        self.create(&body).await
    }

    /// Creates a self-service dashboard session and returns the URL that
    /// opens the dashboard with it.
    pub async fn create_self_service_session(
        &self,
        params: SelfServiceSessionParams,
    ) -> Result<Url, Error> {
        require_non_empty("user id", &params.user_id)?;
        require_non_empty("tenant id", &params.tenant_id)?;
        require_non_empty("redirect url", &params.redirect_url)?;
        let body = SessionBody {
            session_type: "ssdash",
            user_id: &params.user_id,
            tenant_id: Some(&params.tenant_id),
            self_service_strategy: Some(params.strategy),
            ttl: params.ttl.map(|ttl| ttl.as_secs()),
        };
        let token = self.create(&body).await?;
        self_service_url(
            self.client.config().endpoints().self_service_dash(),
            &token,
            &params.redirect_url,
        )
    }

    async fn create(&self, body: &SessionBody<'_>) -> Result<String, Error> {
        let response: SessionResponse = self
            .client
            .inner()
            .request(
                Endpoint::Api,
                Method::POST,
                SESSIONS_PATH,
                Some(body),
                &RequestOptions::default(),
            )
            .await?;
        if response.token.is_empty() {
            return Err(Error::invalid_response("session response has an empty token"));
        }
        Ok(response.token)
    }
}

impl std::fmt::Debug for SessionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionsClient").finish_non_exhaustive()
    }
}

/// `<dash>/<token>?redirectUrl=<redirect>`
fn self_service_url(dash: &Url, token: &str, redirect_url: &str) -> Result<Url, Error> {
    let mut url = dash.clone();
    url.path_segments_mut()
        .map_err(|()| Error::configuration(format!("invalid dashboard endpoint: {}", dash)))?
        .pop_if_empty()
        .push(token);
    url.query_pairs_mut()
        .clear()
        .append_pair("redirectUrl", redirect_url);
    Ok(url)
}


#[cfg(test)]
mod wiremock_tests {
    use super::*;
    use crate::client::test_client;
    use crate::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_authorization_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .and(body_json(json!({"type": "sess", "userId": "alice"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "sess_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let sessions = test_client(&server.uri()).sessions();
        let token = sessions
            .create_authorization_session(
                AuthorizationSessionParams::builder().user_id("alice").build(),
            )
            .await
            .unwrap();
        assert_eq!(token, "sess_1");
    }

    #[tokio::test]
    async fn test_self_service_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .and(body_json(json!({
                "type": "ssdash",
                "userId": "alice",
                "tenantId": "acme",
                "selfServiceStrategy": "rbac",
                "ttl": 600
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "ss_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let sessions = test_client(&server.uri()).sessions();
        let url = sessions
            .create_self_service_session(
                SelfServiceSessionParams::builder()
                    .user_id("alice")
                    .tenant_id("acme")
                    .redirect_url("https://app.example.com")
                    .strategy(SelfServiceStrategy::Rbac)
                    .ttl(Duration::from_secs(600))
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dash.example.com/ss_1?redirectUrl=https%3A%2F%2Fapp.example.com"
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": ""})))
            .mount(&server)
            .await;

        let sessions = test_client(&server.uri()).sessions();
        let err = sessions
            .create_authorization_session(
                AuthorizationSessionParams::builder().user_id("alice").build(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }
}
