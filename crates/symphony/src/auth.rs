//! Certificate-based authentication against the session and key manager
//! endpoints.
//!
//! Both endpoints are called with the bot's client certificate and each
//! returns a token. The pair ([`SymAuth`]) must accompany every subsequent
//! pod and agent call as the `sessionToken` and `keyManagerToken` headers.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::SymConfig;
use crate::error::{Result, SymError};

const SESSION_AUTH_PATH: &str = "/sessionauth/v1/authenticate";
const KEY_AUTH_PATH: &str = "/keyauth/v1/authenticate";
const LOGOUT_PATH: &str = "/sessionauth/v1/logout";

/// Session and key manager token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct SymAuth {
    pub session_token: String,
    pub key_manager_token: String,
}

impl fmt::Debug for SymAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymAuth")
            .field("session_token", &"<redacted>")
            .field("key_manager_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[allow(dead_code)]
    name: Option<String>,
    token: String,
}

/// Performs and caches certificate logins.
pub struct Authenticator {
    client: Client,
    session_auth_url: String,
    key_auth_url: String,
    current: Mutex<Option<SymAuth>>,
}

impl Authenticator {
    /// Build an authenticator for the given config.
    ///
    /// When `botCertPath` is set the PEM file is loaded as the TLS client
    /// identity; otherwise a plain client is used (useful behind a TLS
    /// terminating proxy and in tests).
    pub fn new(config: &SymConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(30));
        if let Some(path) = config.bot_cert_path.as_deref() {
            let pem = std::fs::read(path).map_err(|e| {
                SymError::Config(format!("failed to read bot certificate {path}: {e}"))
            })?;
            let identity = reqwest::Identity::from_pem(&pem)?;
            builder = builder.identity(identity);
        }

        Ok(Self {
            client: builder.build()?,
            session_auth_url: config.session_auth_base().to_string(),
            key_auth_url: config.key_auth_base().to_string(),
            current: Mutex::new(None),
        })
    }

    /// Log in against both endpoints and cache the resulting pair.
    pub async fn authenticate(&self) -> Result<SymAuth> {
        let mut current = self.current.lock().await;
        let auth = self.login().await?;
        *current = Some(auth.clone());
        Ok(auth)
    }

    /// Return the cached pair, logging in first if there is none.
    pub async fn current(&self) -> Result<SymAuth> {
        let mut current = self.current.lock().await;
        if let Some(auth) = current.as_ref() {
            return Ok(auth.clone());
        }
        let auth = self.login().await?;
        *current = Some(auth.clone());
        Ok(auth)
    }

    /// Replace a rejected token pair.
    ///
    /// If another caller already refreshed since `stale` was handed out, the
    /// newer pair is returned without logging in again.
    pub async fn refresh(&self, stale: &SymAuth) -> Result<SymAuth> {
        let mut current = self.current.lock().await;
        if let Some(auth) = current.as_ref() {
            if auth != stale {
                return Ok(auth.clone());
            }
        }
        tracing::info!(target = "symphony::auth", "session rejected, re-authenticating");
        let auth = self.login().await?;
        *current = Some(auth.clone());
        Ok(auth)
    }

    /// End the session. The cached pair is cleared even if the call fails.
    pub async fn logout(&self) -> Result<()> {
        let Some(auth) = self.current.lock().await.take() else {
            return Ok(());
        };
        let response = self
            .client
            .post(format!("{}{}", self.session_auth_url, LOGOUT_PATH))
            .header("sessionToken", &auth.session_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SymError::Auth(format!(
                "logout returned {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }

    async fn login(&self) -> Result<SymAuth> {
        let session_token = self
            .fetch_token(&self.session_auth_url, SESSION_AUTH_PATH)
            .await?;
        let key_manager_token = self.fetch_token(&self.key_auth_url, KEY_AUTH_PATH).await?;
        tracing::debug!(target = "symphony::auth", "authenticated bot session");
        Ok(SymAuth {
            session_token,
            key_manager_token,
        })
    }

    async fn fetch_token(&self, base: &str, path: &str) -> Result<String> {
        let response = self.client.post(format!("{base}{path}")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SymError::Auth(format!(
                "{path} returned {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }
        let token: TokenResponse = response.json().await?;
        if token.token.is_empty() {
            return Err(SymError::Auth(format!("{path} returned an empty token")));
        }
        Ok(token.token)
    }
}

#[cfg(test)]
mod tests {
    use super::SymAuth;

    #[test]
    fn debug_output_hides_tokens() {
        let auth = SymAuth {
            session_token: "secret-session".into(),
            key_manager_token: "secret-km".into(),
        };
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("redacted"));
    }
}
