//! Request execution off the UI thread.
//!
//! Screens never touch the network: they return [`ApiRequest`] values, the
//! shell tags them with an [`Origin`], and the [`Dispatcher`] runs them on the
//! tokio runtime. Results come back as [`Completion`]s over an unbounded
//! channel that the event loop drains every tick.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::model::StatusMessage;
use crate::api::{
    Account, AccountId, CreateAccountRequest, CreatedAccount, DirectoryClient, HealthReport, Role,
    RoleId, UpdateAccountRequest,
};
use crate::app::Origin;
use crate::error::ApiError;

/// One remote action a screen wants performed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiRequest {
    Health,
    LoadCatalog,
    CreateAccount(CreateAccountRequest),
    FetchAccount(AccountId),
    /// Account summary followed by its role list, as one action.
    FetchAccountWithRoles(AccountId),
    UpdateAccount {
        id: AccountId,
        changes: UpdateAccountRequest,
    },
    DeleteAccount(AccountId),
    FetchRoles(AccountId),
    GrantRoles {
        id: AccountId,
        roles: Vec<RoleId>,
    },
    RevokeRoles {
        id: AccountId,
        roles: Vec<RoleId>,
    },
}

impl ApiRequest {
    /// Short name for logs. Request bodies may carry passwords.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiRequest::Health => "health",
            ApiRequest::LoadCatalog => "load_catalog",
            ApiRequest::CreateAccount(_) => "create_account",
            ApiRequest::FetchAccount(_) => "fetch_account",
            ApiRequest::FetchAccountWithRoles(_) => "fetch_account_with_roles",
            ApiRequest::UpdateAccount { .. } => "update_account",
            ApiRequest::DeleteAccount(_) => "delete_account",
            ApiRequest::FetchRoles(_) => "fetch_roles",
            ApiRequest::GrantRoles { .. } => "grant_roles",
            ApiRequest::RevokeRoles { .. } => "revoke_roles",
        }
    }
}

/// Successful result of an [`ApiRequest`].
#[derive(Clone, Debug)]
pub enum ApiReply {
    Health(HealthReport),
    Catalog(Vec<Role>),
    Created(CreatedAccount),
    Account(Account),
    AccountWithRoles { account: Account, roles: Vec<Role> },
    Roles(Vec<Role>),
    Ack(StatusMessage),
}

pub type Outcome = Result<ApiReply, ApiError>;

#[derive(Debug)]
pub struct Completion {
    pub origin: Origin,
    pub request: ApiRequest,
    pub outcome: Outcome,
}

/// Perform `request` against the API.
pub async fn execute(client: &DirectoryClient, request: &ApiRequest) -> Outcome {
    let reply = match request {
        ApiRequest::Health => ApiReply::Health(client.health().await?),
        ApiRequest::LoadCatalog => ApiReply::Catalog(client.list_roles().await?),
        ApiRequest::CreateAccount(body) => ApiReply::Created(client.create_account(body).await?),
        ApiRequest::FetchAccount(id) => ApiReply::Account(client.fetch_account(*id).await?),
        ApiRequest::FetchAccountWithRoles(id) => {
            let account = client.fetch_account(*id).await?;
            let roles = client.fetch_roles(*id).await?;
            ApiReply::AccountWithRoles { account, roles }
        }
        ApiRequest::UpdateAccount { id, changes } => {
            ApiReply::Ack(client.update_account(*id, changes).await?)
        }
        ApiRequest::DeleteAccount(id) => ApiReply::Ack(client.delete_account(*id).await?),
        ApiRequest::FetchRoles(id) => ApiReply::Roles(client.fetch_roles(*id).await?),
        ApiRequest::GrantRoles { id, roles } => ApiReply::Ack(client.grant_roles(*id, roles).await?),
        ApiRequest::RevokeRoles { id, roles } => {
            ApiReply::Ack(client.revoke_roles(*id, roles).await?)
        }
    };
    Ok(reply)
}

/// Spawns requests on a runtime and reports back over a channel.
pub struct Dispatcher {
    client: DirectoryClient,
    runtime: Handle,
    tx: UnboundedSender<Completion>,
}

impl Dispatcher {
    pub fn new(client: DirectoryClient, runtime: Handle) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, runtime, tx }, rx)
    }

    pub fn submit(&self, origin: Origin, request: ApiRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tracing::debug!(?origin, request = request.kind(), "dispatching");
        self.runtime.spawn(async move {
            let outcome = execute(&client, &request).await;
            if tx.send(Completion { origin, request, outcome }).is_err() {
                tracing::debug!("completion dropped: event loop has exited");
            }
        });
    }

    pub fn submit_all(&self, batch: Vec<(Origin, ApiRequest)>) {
        for (origin, request) in batch {
            self.submit(origin, request);
        }
    }
}
