//! Internal client implementation: the single request/response path every
//! operation goes through.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::Error;
use crate::types::{RequestOptions, WarrantToken};

/// Header carrying the consistency token in both directions.
pub(crate) const WARRANT_TOKEN_HEADER: &str = "warrant-token";

/// Which configured base URL a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    /// CRUD, query and session traffic.
    Api,
    /// Authorization checks.
    Authorize,
}

pub(crate) struct ClientInner {
    /// Immutable configuration.
    pub config: Config,

    /// Pooled HTTP client shared by all clones.
    http_client: reqwest::Client,
}

impl ClientInner {
    pub(crate) fn new(config: Config) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
            Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e)
        })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Joins an endpoint base with an absolute request path.
    ///
    /// The base's own path is kept, so `https://host/prefix` + `/v2/objects`
    /// yields `https://host/prefix/v2/objects`.
    fn build_url(&self, endpoint: Endpoint, path: &str) -> Result<Url, Error> {
        let base = match endpoint {
            Endpoint::Api => self.config.endpoints().api(),
            Endpoint::Authorize => self.config.endpoints().authorize(),
        };
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| {
            Error::request_construction(format!("invalid request URL {:?}: {}", joined, e))
                .with_source(e)
        })
    }

    fn build_headers(&self, options: &RequestOptions, has_body: bool) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let mut auth_value =
            HeaderValue::from_str(&format!("ApiKey {}", self.config.api_key())).map_err(|_| {
                Error::request_construction("API key contains characters not allowed in a header")
            })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(crate::user_agent::user_agent())
                .map_err(|_| Error::request_construction("invalid User-Agent header"))?,
        );

        if let Some(token) = &options.warrant_token {
            headers.insert(
                WARRANT_TOKEN_HEADER,
                HeaderValue::from_str(token.value()).map_err(|_| {
                    Error::request_construction(format!("invalid warrant token {:?}", token.value()))
                })?,
            );
        }

        Ok(headers)
    }

    /// Sends one request and returns the raw response if its status is in
    /// `[200, 400)`.
    ///
    /// Other statuses become [`ErrorKind::Api`](crate::ErrorKind::Api) errors
    /// carrying the status and the raw body text. There is no retry.
    pub(crate) async fn send<T>(
        &self,
        endpoint: Endpoint,
        method: Method,
        path: &str,
        payload: Option<&T>,
        options: &RequestOptions,
    ) -> Result<Response, Error>
    where
        T: Serialize + ?Sized,
    {
        let body = payload
            .map(|p| {
                serde_json::to_vec(p).map_err(|e| {
                    Error::invalid_payload(format!("failed to serialize request body: {}", e))
                        .with_source(e)
                })
            })
            .transpose()?;
        let url = self.build_url(endpoint, path)?;
        let headers = self.build_headers(options, body.is_some())?;

        tracing::debug!(method = %method, url = %url, "sending warrant request");

        let mut request = self.http_client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            Error::transport(format!("{} {} failed: {}", method, path, e)).with_source(e)
        })?;

        let status = response.status().as_u16();
        if (200..400).contains(&status) {
            tracing::debug!(method = %method, path, status, "warrant request completed");
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(
                    method = %method,
                    path,
                    status,
                    error = %e,
                    "failed to read error response body"
                );
                String::new()
            }
        };
        tracing::debug!(method = %method, path, status, body = %body, "warrant request failed");
        Err(Error::api(status, body))
    }

    /// Sends a request and decodes the JSON response.
    pub(crate) async fn request<T, R>(
        &self,
        endpoint: Endpoint,
        method: Method,
        path: &str,
        payload: Option<&T>,
        options: &RequestOptions,
    ) -> Result<R, Error>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(endpoint, method, path, payload, options).await?;
        decode(response).await
    }

    /// Sends a request, decodes the JSON response and returns it with the
    /// `Warrant-Token` response header.
    pub(crate) async fn request_with_token<T, R>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&T>,
    ) -> Result<(R, Option<WarrantToken>), Error>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .send(Endpoint::Api, method, path, payload, &RequestOptions::default())
            .await?;
        let token = warrant_token(&response);
        Ok((decode(response).await?, token))
    }

    /// Sends a request whose response body is ignored, returning only the
    /// `Warrant-Token` response header.
    pub(crate) async fn request_token<T>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&T>,
    ) -> Result<Option<WarrantToken>, Error>
    where
        T: Serialize + ?Sized,
    {
        let response = self
            .send(Endpoint::Api, method, path, payload, &RequestOptions::default())
            .await?;
        Ok(warrant_token(&response))
    }
}

/// Decodes a JSON response body.
pub(crate) async fn decode<R>(response: Response) -> Result<R, Error>
where
    R: DeserializeOwned,
{
    let bytes = response.bytes().await.map_err(|e| {
        Error::transport(format!("failed to read response body: {}", e)).with_source(e)
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        Error::invalid_response(format!("failed to parse response: {}", e)).with_source(e)
    })
}

/// Reads the `Warrant-Token` response header, if present.
pub(crate) fn warrant_token(response: &Response) -> Option<WarrantToken> {
    response
        .headers()
        .get(WARRANT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(WarrantToken::new)
}

/// Percent-encodes one path segment.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
