//! Wire types for the directory API, one per request/response shape.
//!
//! The platform behind the API encodes empty text fields as JSON `false`,
//! so optional strings go through [`falsy_string`]. Anything that is not a
//! string, `null` or `false` is a decode error rather than a silent default.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

pub type AccountId = u64;
pub type RoleId = u64;

/// Account record as returned by `GET /users/{id}`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    #[serde(default, deserialize_with = "falsy_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub email: Option<String>,
    pub active: bool,
    #[serde(rename = "groups_id")]
    pub role_ids: Vec<RoleId>,
}

impl Account {
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn login_or_empty(&self) -> &str {
        self.login.as_deref().unwrap_or("")
    }

    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}

/// A role (group) from the catalog or from an account's role list.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default, rename = "category_id", deserialize_with = "category_label")]
    pub category: Option<String>,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), category: None }
    }

    /// "Category / Name" when a category is known.
    pub fn label(&self) -> String {
        match &self.category {
            Some(c) => format!("{} / {}", c, self.name),
            None => self.name.clone(),
        }
    }
}

/// `{groups: [...]}`: the catalog and per-account role list share this shape.
#[derive(Clone, Debug, Deserialize)]
pub struct RoleList {
    pub groups: Vec<Role>,
}

/// External-directory attributes attached to a new account.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ExternalIds {
    /// Distinguished name.
    pub id: String,
    pub guid: String,
    /// User-principal id.
    pub up_id: String,
    pub display_name: String,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct UserAccount {
    pub login_name: String,
    pub other_ids: ExternalIds,
}

/// Body of `POST /users/`.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub user_account: UserAccount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<RoleId>,
}

/// Response of `POST /users/`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CreatedAccount {
    pub user_id: AccountId,
    pub password: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
}

impl CreatedAccount {
    /// Placeholder the server sends back when the caller chose the password.
    pub const MASKED_PASSWORD: &'static str = "***";

    /// The generated password, unless the server masked it.
    pub fn revealed_password(&self) -> Option<&str> {
        if self.password == Self::MASKED_PASSWORD {
            None
        } else {
            Some(&self.password)
        }
    }
}

/// Body of `PUT /users/{id}`. Absent fields are left unchanged server-side.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct UpdateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<RoleId>>,
}

impl UpdateAccountRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.login.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.groups.is_none()
    }
}

/// Body of `POST|DELETE /users/{id}/roles`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RoleChange {
    pub groups: Vec<RoleId>,
}

/// `{message}` acknowledgement returned by mutations.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /health`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    #[serde(default, rename = "odoo_connection")]
    pub platform_connected: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

fn falsy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Flag(bool),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Flag(false)) => Ok(None),
        Some(Raw::Text(s)) => Ok(Some(s)),
        Some(Raw::Flag(true)) => Err(de::Error::custom("expected a string or false, found true")),
    }
}

fn category_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Pair(u64, String),
        Flag(bool),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Flag(false)) => Ok(None),
        Some(Raw::Pair(_, label)) => Ok(Some(label)),
        Some(Raw::Flag(true)) => Err(de::Error::custom("expected [id, label] or false, found true")),
    }
}
