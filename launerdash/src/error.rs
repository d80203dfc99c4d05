//! Error taxonomy shared by the gateway, login flow and pollers.

use thiserror::Error;

/// Failure of a single outbound call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Session missing or expired. The call never left the process.
    #[error("session missing or expired")]
    Unauthenticated,

    /// Network error, non-2xx status or an undecodable payload.
    #[error("request failed (status {}): {body}", fmt_status(.status))]
    RequestFailed { status: Option<u16>, body: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated => None,
            ApiError::RequestFailed { status, .. } => *status,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let body = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        ApiError::RequestFailed { status, body }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// Login failure as reported to the user. Backend detail goes to the log only.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,

    #[error("Please fill in both username and password.")]
    MissingFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_display_includes_status() {
        let e = ApiError::RequestFailed {
            status: Some(503),
            body: "busy".into(),
        };
        assert_eq!(e.to_string(), "request failed (status 503): busy");
        assert_eq!(e.status(), Some(503));

        let e = ApiError::RequestFailed {
            status: None,
            body: "connection refused".into(),
        };
        assert!(e.to_string().contains("status none"));
    }

    #[test]
    fn auth_error_is_generic() {
        assert!(!AuthError::InvalidCredentials.to_string().contains("401"));
    }
}
