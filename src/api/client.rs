//! Bearer-authenticated HTTP client for the Evolance REST API.
//!
//! Every request is resolved against the configured API base and carries
//! `Authorization: Bearer <token>` whenever the token store holds a token.
//! Failures are reported immediately: there is no retry, backoff or
//! client-side timeout, so screens can show their inline error right away.

use crate::core::token_store::TokenStore;
use crate::utils::url::construct_api_url;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Failure taxonomy shared by every API call.
#[derive(Debug)]
pub enum ApiError {
    /// No response was received.
    Network(reqwest::Error),
    /// The server answered with a non-2xx status.
    Http {
        status: StatusCode,
        /// Response body, kept for diagnostics only.
        body: String,
    },
    /// The payload could not be encoded or decoded.
    Decode(serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(err) => write!(f, "network error: {err}"),
            ApiError::Http { status, body } if body.is_empty() => {
                write!(f, "request failed with status {status}")
            }
            ApiError::Http { status, body } => {
                write!(f, "request failed with status {status}: {body}")
            }
            ApiError::Decode(err) => write!(f, "malformed payload: {err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Network(err) => Some(err),
            ApiError::Http { .. } => None,
            ApiError::Decode(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err)
    }
}

/// A single call against the API, relative to the configured base.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_vec(body).map_err(ApiError::Decode)?);
        Ok(self)
    }

    /// Authenticate with `token` instead of the stored one.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, tokens)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Issue `method path` with an optional JSON body and decode the reply.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.send(request).await
    }

    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let text = self.execute(request).await?;
        serde_json::from_str(&text).map_err(ApiError::Decode)
    }

    /// Send a request whose response body is ignored once the status is 2xx.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: ApiRequest) -> Result<String, ApiError> {
        let url = construct_api_url(&self.base_url, &request.path);
        debug!(method = %request.method, path = %request.path, "api request");

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.bearer_for(&request) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            debug!(%status, path = %request.path, "api request rejected");
            return Err(ApiError::Http { status, body: text });
        }
        Ok(text)
    }

    fn bearer_for(&self, request: &ApiRequest) -> Option<String> {
        if let Some(token) = &request.bearer {
            return Some(token.clone());
        }
        match self.tokens.get() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "token store unavailable; sending request without credentials");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token_store::MemoryTokenStore;
    use crate::utils::test_utils::{test_client, MockResponse, MockServer};
    use serde_json::json;

    #[tokio::test]
    async fn attaches_stored_bearer_token() {
        let server = MockServer::start(vec![(
            "GET",
            "/api/auth/me",
            MockResponse::json(200, json!({"ok": true})),
        )])
        .await;
        let tokens = Arc::new(MemoryTokenStore::with_token("opaque.token"));
        let client = test_client(&server, tokens);

        let value: serde_json::Value = client
            .request(Method::GET, "auth/me", None)
            .await
            .expect("request should succeed");
        assert_eq!(value, json!({"ok": true}));

        let requests = server.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].header("authorization"),
            Some("Bearer opaque.token")
        );
    }

    #[tokio::test]
    async fn omits_authorization_without_token() {
        let server = MockServer::start(vec![(
            "GET",
            "/api/personality/questions",
            MockResponse::json(200, json!([])),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::new()));

        let _: Vec<serde_json::Value> = client
            .send(ApiRequest::get("/personality/questions"))
            .await
            .expect("request should succeed");

        let requests = server.requests().await;
        assert_eq!(requests[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn explicit_bearer_overrides_store() {
        let server = MockServer::start(vec![(
            "GET",
            "/api/auth/me",
            MockResponse::json(200, json!({})),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::with_token("stale")));

        let _: serde_json::Value = client
            .send(ApiRequest::get("auth/me").bearer("fresh"))
            .await
            .unwrap();

        let requests = server.requests().await;
        assert_eq!(requests[0].header("authorization"), Some("Bearer fresh"));
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start(vec![(
            "GET",
            "/api/auth/me",
            MockResponse::json(401, json!({"detail": "Could not validate credentials"})),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::with_token("bad")));

        let err = client
            .send::<serde_json::Value>(ApiRequest::get("auth/me"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start(vec![(
            "GET",
            "/api/stories",
            MockResponse::raw(200, "not json"),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::new()));

        let err = client
            .send::<Vec<serde_json::Value>>(ApiRequest::get("stories"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = ApiClient::with_http_client(
            http,
            format!("http://{addr}/api"),
            Arc::new(MemoryTokenStore::new()),
        );

        let err = client
            .send::<serde_json::Value>(ApiRequest::get("auth/me"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn json_body_and_query_are_sent() {
        let server = MockServer::start(vec![(
            "POST",
            "/api/chat/message",
            MockResponse::json(200, json!({"message": "hi", "is_user": false})),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::new()));

        let request = ApiRequest::post("chat/message")
            .query("message", "hello there")
            .json(&json!({"extra": 1}))
            .unwrap();
        client.send_empty(request).await.unwrap();

        let requests = server.requests().await;
        assert_eq!(requests[0].target, "/api/chat/message?message=hello+there");
        assert_eq!(requests[0].header("content-type"), Some("application/json"));
        assert_eq!(requests[0].body, r#"{"extra":1}"#);
    }
}
