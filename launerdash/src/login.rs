//! Credential exchange. A successful login opens a fixed 30 minute session.

use std::time::Duration;

use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use crate::api::LOGIN;
use crate::error::AuthError;
use crate::gateway::Gateway;
use crate::session::Credentials;
use crate::types::LoginResponse;

pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Verify credentials with the backend and store the resulting session.
/// On failure the current session is left as it was.
pub async fn login(gw: &Gateway, username: &str, password: &str) -> Result<Credentials, AuthError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    let body = json!({ "username": username, "password": password });
    match gw
        .request_anonymous::<LoginResponse>(Method::POST, LOGIN, Some(body))
        .await
    {
        Ok(resp) => {
            // Window starts when the response arrived.
            let creds = gw.session().set_session(resp.access_token, SESSION_TTL);
            info!(user = username, "login succeeded");
            Ok(creds)
        }
        Err(e) => {
            warn!(user = username, error = %e, "login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}
