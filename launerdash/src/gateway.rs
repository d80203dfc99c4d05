//! Authenticated request gateway: every outbound call goes through here.
//!
//! The session is checked on each call, before the credential is attached and
//! before anything is sent, so a session that expires between two polls of the
//! same subscription is caught on the second poll.

use std::{fs, sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::error::ApiError;
use crate::guard::Navigator;
use crate::session::SessionStore;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Gateway {
    http: Client,
    base: Url,
    session: Arc<SessionStore>,
    nav: Arc<dyn Navigator>,
}

impl Gateway {
    pub fn new(
        base: Url,
        tls_ca: Option<&str>,
        session: Arc<SessionStore>,
        nav: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(path) = tls_ca {
            let pem = fs::read(path)
                .map_err(|e| anyhow::anyhow!("reading TLS CA {path}: {e}"))?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }
        Ok(Self {
            http: builder.build()?,
            base,
            session,
            nav,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Authenticated call. Fails with `Unauthenticated` without touching the
    /// network when the session is missing or expired.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let Some(token) = self.session.valid_token() else {
            info!(path, "session invalid, request not sent");
            self.session.clear();
            self.nav.redirect_to_login();
            return Err(ApiError::Unauthenticated);
        };
        let req = self.build(method, path, body).bearer_auth(token);
        self.dispatch(req).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    /// Unauthenticated call; only the login exchange uses this.
    pub async fn request_anonymous<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let req = self.build(method, path, body);
        self.dispatch(req).await
    }

    fn build(&self, method: Method, path: &str, body: Option<Value>) -> RequestBuilder {
        let url = endpoint_url(&self.base, path);
        let req = self.http.request(method, url);
        match body {
            Some(b) => req.json(&b),
            None => req,
        }
    }

    async fn dispatch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(%status, "request rejected");
            return Err(ApiError::RequestFailed {
                status: Some(status.as_u16()),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::RequestFailed {
            status: Some(status.as_u16()),
            body: format!("invalid payload: {e}"),
        })
    }
}

/// `base` + `path`, keeping the base's own path prefix (e.g. `/api`).
pub fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Accepts only absolute http(s) URLs.
pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("unsupported scheme '{other}' in {raw} (expected http or https)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let base = Url::parse("http://localhost:8000/api").unwrap();
        assert_eq!(
            endpoint_url(&base, "/current-usages"),
            "http://localhost:8000/api/current-usages"
        );
        let base = Url::parse("http://localhost:8000/api/").unwrap();
        assert_eq!(endpoint_url(&base, "login"), "http://localhost:8000/api/login");
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(parse_base_url("http://h:1/api").is_ok());
        assert!(parse_base_url("https://h/api").is_ok());
        assert!(parse_base_url("ws://h/ws").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
