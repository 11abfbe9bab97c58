use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::model::{
    Account, AccountId, CreateAccountRequest, CreatedAccount, HealthReport, Role, RoleChange,
    RoleId, RoleList, StatusMessage, UpdateAccountRequest,
};
use crate::error::{ApiError, extract_detail};

#[derive(Clone, Copy, Debug)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    fn method(self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Typed client for the directory API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    base: String,
    http: reqwest::Client,
}

impl DirectoryClient {
    /// Build a client rooted at `base_url` (paths are appended to it).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = reqwest::Url::parse(base_url.trim())
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport { path: String::new(), source })?;
        Ok(Self {
            base: base_url.trim().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Root URL requests are issued against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `GET /health`: backend status and platform connectivity.
    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        self.send::<(), _>(Verb::Get, "/health".to_string(), None).await
    }

    /// `GET /groups/`: the full role catalog.
    pub async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        let list: RoleList = self.send::<(), _>(Verb::Get, "/groups/".to_string(), None).await?;
        Ok(list.groups)
    }

    /// `POST /users/`: create an account; the reply may reveal a generated password.
    pub async fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<CreatedAccount, ApiError> {
        let created: CreatedAccount = self
            .send(Verb::Post, "/users/".to_string(), Some(request))
            .await?;
        tracing::info!(user_id = created.user_id, login = %request.user_account.login_name, "account created");
        Ok(created)
    }

    /// `GET /users/{id}`.
    pub async fn fetch_account(&self, id: AccountId) -> Result<Account, ApiError> {
        self.send::<(), _>(Verb::Get, format!("/users/{id}"), None).await
    }

    /// `PUT /users/{id}` with only the fields being changed.
    pub async fn update_account(
        &self,
        id: AccountId,
        changes: &UpdateAccountRequest,
    ) -> Result<StatusMessage, ApiError> {
        let ack = self.send(Verb::Put, format!("/users/{id}"), Some(changes)).await?;
        tracing::info!(user_id = id, "account updated");
        Ok(ack)
    }

    /// `DELETE /users/{id}`.
    pub async fn delete_account(&self, id: AccountId) -> Result<StatusMessage, ApiError> {
        let ack = self.send::<(), _>(Verb::Delete, format!("/users/{id}"), None).await?;
        tracing::info!(user_id = id, "account deleted");
        Ok(ack)
    }

    /// `GET /users/{id}/roles`: roles currently held by the account.
    pub async fn fetch_roles(&self, id: AccountId) -> Result<Vec<Role>, ApiError> {
        let list: RoleList = self
            .send::<(), _>(Verb::Get, format!("/users/{id}/roles"), None)
            .await?;
        Ok(list.groups)
    }

    /// `POST /users/{id}/roles`: add roles to the account.
    pub async fn grant_roles(
        &self,
        id: AccountId,
        roles: &[RoleId],
    ) -> Result<StatusMessage, ApiError> {
        let body = RoleChange { groups: roles.to_vec() };
        let ack = self
            .send(Verb::Post, format!("/users/{id}/roles"), Some(&body))
            .await?;
        tracing::info!(user_id = id, ?roles, "roles granted");
        Ok(ack)
    }

    /// `DELETE /users/{id}/roles`: remove roles. The ids travel in the body.
    pub async fn revoke_roles(
        &self,
        id: AccountId,
        roles: &[RoleId],
    ) -> Result<StatusMessage, ApiError> {
        let body = RoleChange { groups: roles.to_vec() };
        let ack = self
            .send(Verb::Delete, format!("/users/{id}/roles"), Some(&body))
            .await?;
        tracing::info!(user_id = id, ?roles, "roles revoked");
        Ok(ack)
    }

    async fn send<B, T>(&self, verb: Verb, path: String, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut req = self.http.request(verb.method(), format!("{}{}", self.base, path));
        if let Some(body) = body {
            req = req.json(body);
        }
        tracing::debug!(method = verb.as_str(), %path, "sending request");

        let resp = req.send().await.map_err(|source| {
            tracing::warn!(method = verb.as_str(), %path, error = %source, "request failed");
            ApiError::Transport { path: path.clone(), source }
        })?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { path: path.clone(), source })?;

        if !status.is_success() {
            let detail = extract_detail(&bytes);
            tracing::warn!(
                method = verb.as_str(),
                %path,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "request rejected"
            );
            return Err(ApiError::Status {
                method: verb.as_str(),
                path,
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| {
            tracing::warn!(method = verb.as_str(), %path, error = %source, "response shape mismatch");
            ApiError::Decode { path, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_validated_and_normalised() {
        let c = DirectoryClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(c.base_url(), "http://localhost:8000");

        let c = DirectoryClient::new("https://example.com/api", Duration::from_secs(1)).unwrap();
        assert_eq!(c.base_url(), "https://example.com/api");

        assert!(matches!(
            DirectoryClient::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            DirectoryClient::new("ftp://example.com", Duration::from_secs(1)),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }
}
