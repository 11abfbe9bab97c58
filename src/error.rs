//! Error types shared across the crate.
//!
//! Two families exist: [`ValidationError`] for input rejected before any
//! request is sent, and [`ApiError`] for everything that goes wrong while
//! talking to the directory API.

use thiserror::Error;

/// Local input problems. No request is ever sent when one of these is raised.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Login name is required")]
    BlankLogin,
    #[error("Enter an account ID")]
    MissingAccountId,
    #[error("Account ID must be a positive number, got '{0}'")]
    InvalidAccountId(String),
    #[error("Search for an account first")]
    NoAccountLoaded,
    #[error("Select at least one role to grant")]
    NothingToGrant,
    #[error("Select at least one role to revoke")]
    NothingToRevoke,
    #[error("Tick the confirmation box before deleting")]
    DeletionNotConfirmed,
}

/// Failures of a remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {path} returned HTTP {status}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        detail: Option<String>,
    },
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response shape from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Detail text provided by the server, if the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a rejected call.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Banner text for this failure: the server detail, or `fallback`.
    pub fn banner_text(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

/// Pull the human-readable detail out of an error body.
///
/// Accepts `{"detail": "text"}` and the validation form
/// `{"detail": [{"msg": "..."}, ...]}`. Anything else yields `None`.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_from_plain_string() {
        let body = r#"{"detail":"Utilisateur non trouvé"}"#.as_bytes();
        assert_eq!(extract_detail(body).as_deref(), Some("Utilisateur non trouvé"));
    }

    #[test]
    fn detail_from_validation_list() {
        let body = br#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"},{"msg":"field required"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("value is not a valid email address; field required")
        );
    }

    #[test]
    fn detail_missing_or_not_json() {
        assert_eq!(extract_detail(b"Internal Server Error"), None);
        assert_eq!(extract_detail(br#"{"message":"x"}"#), None);
        assert_eq!(extract_detail(br#"{"detail":""}"#), None);
    }

    #[test]
    fn banner_prefers_server_detail() {
        let err = ApiError::Status {
            method: "GET",
            path: "/users/3".into(),
            status: 404,
            detail: Some("gone".into()),
        };
        assert_eq!(err.banner_text("Account not found"), "gone");
        assert_eq!(err.status(), Some(404));

        let err = ApiError::Status {
            method: "GET",
            path: "/users/3".into(),
            status: 500,
            detail: None,
        };
        assert_eq!(err.banner_text("Account not found"), "Account not found");
    }
}
