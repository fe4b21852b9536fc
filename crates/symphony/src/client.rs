//! HTTP transport shared by every pod and agent client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{multipart::Form, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::auth::{Authenticator, SymAuth};
use crate::config::SymConfig;
use crate::error::{Result, SymError};

const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
const RETRY_BACKOFFS_MS: [u64; 3] = [200, 400, 800];

/// Which deployment a call is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Pod,
    Agent,
}

/// Options for individual requests.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Overrides the client-wide timeout (long-poll reads need more).
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Authenticated HTTP client for pod and agent endpoints.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    pod_url: String,
    agent_url: String,
    auth: Arc<Authenticator>,
}

impl HttpClient {
    /// Create a client for the given config sharing an authenticator.
    pub fn new(config: &SymConfig, auth: Arc<Authenticator>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("symphony-rs/{SDK_VERSION}"))
            .build()?;

        Ok(Self {
            client,
            pod_url: config.pod_url.trim_end_matches('/').to_string(),
            agent_url: config.agent_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Get the pod base URL.
    pub fn pod_url(&self) -> &str {
        &self.pod_url
    }

    /// Get the agent base URL.
    pub fn agent_url(&self) -> &str {
        &self.agent_url
    }

    /// Get the shared authenticator.
    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    fn url(&self, host: Host, path: &str) -> String {
        match host {
            Host::Pod => format!("{}{}", self.pod_url, path),
            Host::Agent => format!("{}{}", self.agent_url, path),
        }
    }

    /// Make a JSON request to the API.
    pub async fn request<T: DeserializeOwned>(
        &self,
        host: Host,
        method: Method,
        path: &str,
        body: Option<impl Serialize>,
        query: Option<&[(&str, &str)]>,
        options: Option<RequestOptions>,
    ) -> Result<T> {
        let url = self.url(host, path);
        let options = options.unwrap_or_default();

        self.execute(|auth| {
            let mut request = self.build_request(method.clone(), &url, auth, &options);
            if let Some(q) = query {
                request = request.query(q);
            }
            if let Some(ref b) = body {
                request = request.json(b);
            }
            Ok(request)
        })
        .await
    }

    /// Make a multipart POST request. `form` is called once per attempt since
    /// a form body cannot be replayed.
    pub async fn post_multipart<T, F>(&self, host: Host, path: &str, form: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<Form>,
    {
        let url = self.url(host, path);
        let options = RequestOptions::default();
        self.execute(|auth| {
            Ok(self
                .build_request(Method::POST, &url, auth, &options)
                .multipart(form()?))
        })
        .await
    }

    /// Make a GET request whose success body is returned as-is rather than
    /// parsed as JSON.
    pub async fn get_text(
        &self,
        host: Host,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<String> {
        let url = self.url(host, path);
        let options = RequestOptions::default();
        let (status, text) = self
            .send(|auth| {
                let mut request = self.build_request(Method::GET, &url, auth, &options);
                if let Some(q) = query {
                    request = request.query(q);
                }
                Ok(request)
            })
            .await?;
        if status.is_success() {
            return Ok(text);
        }
        decode_response::<Value>(status, &text)?;
        Err(SymError::InvalidResponse(format!(
            "unexpected status {}",
            status.as_u16()
        )))
    }

    async fn execute<T, B>(&self, build: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Fn(&SymAuth) -> Result<RequestBuilder>,
    {
        let (status, text) = self.send(build).await?;
        decode_response(status, &text)
    }

    async fn send<B>(&self, build: B) -> Result<(StatusCode, String)>
    where
        B: Fn(&SymAuth) -> Result<RequestBuilder>,
    {
        let mut auth = self.auth.current().await?;
        let mut reauthenticated = false;
        let mut attempt = 0usize;

        loop {
            let response = build(&auth)?.send().await?;
            let status = response.status();

            if status.is_server_error() && attempt < RETRY_BACKOFFS_MS.len() {
                tracing::debug!(
                    target = "symphony::http",
                    status = status.as_u16(),
                    attempt,
                    "server error, retrying"
                );
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFFS_MS[attempt])).await;
                attempt += 1;
                continue;
            }

            if status == StatusCode::UNAUTHORIZED && !reauthenticated {
                reauthenticated = true;
                auth = self.auth.refresh(&auth).await?;
                continue;
            }

            let text = response.text().await?;
            return Ok((status, text));
        }
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        auth: &SymAuth,
        options: &RequestOptions,
    ) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header("sessionToken", &auth.session_token)
            .header("keyManagerToken", &auth.key_manager_token);

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        request
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        host: Host,
        path: &str,
        query: Option<&[(&str, &str)]>,
        options: Option<RequestOptions>,
    ) -> Result<T> {
        self.request::<T>(host, Method::GET, path, None::<()>, query, options)
            .await
    }

    /// Make a POST request.
    pub async fn post<T: DeserializeOwned>(
        &self,
        host: Host,
        path: &str,
        body: Option<impl Serialize>,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T> {
        self.request(host, Method::POST, path, body, query, None)
            .await
    }

    /// Make a POST request whose response body is ignored.
    pub async fn post_unit(
        &self,
        host: Host,
        path: &str,
        body: Option<impl Serialize>,
        query: Option<&[(&str, &str)]>,
    ) -> Result<()> {
        self.request::<Value>(host, Method::POST, path, body, query, None)
            .await?;
        Ok(())
    }

    /// Make a DELETE request.
    pub async fn delete(&self, host: Host, path: &str) -> Result<()> {
        self.request::<Value>(host, Method::DELETE, path, None::<()>, None, None)
            .await?;
        Ok(())
    }
}

/// Map a status and raw body to a typed value or an API error.
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T> {
    if status.is_success() {
        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            // Works for (), Option<T>, Value and the Vec-with-default feed reads.
            return Ok(serde_json::from_value(Value::Null)?);
        }
        return Ok(serde_json::from_str(text)?);
    }

    let parsed: Option<Value> = serde_json::from_str(text).ok();
    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown_error")
                .to_string()
        });
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| text.chars().take(200).collect());

    Err(SymError::api(status.as_u16(), code, message))
}
