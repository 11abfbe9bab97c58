//! The five console screens.
//!
//! Each screen is a plain state machine: it reacts to [`FormInput`] and to
//! request completions, and returns [`Effects`] describing the requests it
//! wants sent. None of them performs I/O.
//!
pub mod create;
pub mod delete;
pub mod edit;
pub mod listing;
pub mod roles;

use crate::app::dispatch::{ApiRequest, Outcome};
use crate::app::form::Banner;

pub use create::CreateAccountForm;
pub use delete::DeleteAccountForm;
pub use edit::UpdateAccountForm;
pub use listing::ListingView;
pub use roles::RolesManager;

/// Editing and navigation input, already resolved from raw keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    Up,
    Down,
    Activate,
    Toggle,
    Reset,
}

/// What a screen asks of the shell after handling an event.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Effects {
    pub requests: Vec<ApiRequest>,
    /// A mutation succeeded; sibling views should refresh.
    pub changed: bool,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn request(request: ApiRequest) -> Self {
        Self { requests: vec![request], changed: false }
    }

    pub fn changed(mut self) -> Self {
        self.changed = true;
        self
    }
}

pub trait Screen {
    /// Initialization run when the screen is mounted.
    fn setup(&mut self) -> Effects {
        Effects::none()
    }

    fn handle(&mut self, input: FormInput) -> Effects;

    /// React to the completion of a request this screen issued.
    fn complete(&mut self, request: &ApiRequest, outcome: Outcome) -> Effects;

    fn banner(&self) -> Option<&Banner>;

    /// Whether printable keys should go to a focused text field.
    fn wants_text(&self) -> bool;
}
