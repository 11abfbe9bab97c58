//! Directory API access: wire model and the HTTP client.
//!
pub mod client;
pub mod model;

pub use client::DirectoryClient;
pub use model::{
    Account, AccountId, CreateAccountRequest, CreatedAccount, ExternalIds, HealthReport, Role,
    RoleId, StatusMessage, UpdateAccountRequest, UserAccount,
};
