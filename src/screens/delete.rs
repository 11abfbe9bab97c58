//! Search-and-delete form.
//!
//! Deletion is irreversible, so it sits behind two gates: a successful
//! search and a separately tracked confirmation toggle.

use super::{Effects, FormInput, Screen};
use crate::api::Account;
use crate::app::dispatch::{ApiReply, ApiRequest, Outcome};
use crate::app::form::{Banner, Phase, TextInput, focus_next, focus_prev};
use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteFocus {
    AccountId,
    Search,
    Confirm,
    Reset,
    Delete,
}

static SEARCH_SLOTS: [DeleteFocus; 3] = [DeleteFocus::AccountId, DeleteFocus::Search, DeleteFocus::Reset];
static FOUND_SLOTS: [DeleteFocus; 5] = [
    DeleteFocus::AccountId,
    DeleteFocus::Search,
    DeleteFocus::Confirm,
    DeleteFocus::Reset,
    DeleteFocus::Delete,
];

#[derive(Clone, Debug, Default)]
pub struct DeleteAccountForm {
    pub account_id: TextInput,
    /// Read-only summary of the fetched account.
    pub summary: Option<Account>,
    pub confirmed: bool,
    pub phase: Phase,
    pub banner: Option<Banner>,
    focus: usize,
}

impl DeleteAccountForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> &'static [DeleteFocus] {
        if self.summary.is_some() { &FOUND_SLOTS } else { &SEARCH_SLOTS }
    }

    pub fn focus(&self) -> DeleteFocus {
        let slots = self.slots();
        slots[self.focus.min(slots.len() - 1)]
    }

    pub fn search(&mut self) -> Effects {
        if matches!(self.phase, Phase::Searching | Phase::Submitting) {
            return Effects::none();
        }
        match self.account_id.account_id() {
            Ok(id) => {
                self.banner = None;
                self.summary = None;
                self.confirmed = false;
                self.phase = Phase::Searching;
                Effects::request(ApiRequest::FetchAccount(id))
            }
            Err(err) => {
                self.banner = Some(err.into());
                Effects::none()
            }
        }
    }

    pub fn toggle_confirmation(&mut self) {
        if self.summary.is_some() && self.phase == Phase::Found {
            self.confirmed = !self.confirmed;
        }
    }

    /// Whether the delete action is enabled.
    pub fn can_delete(&self) -> bool {
        self.phase == Phase::Found && self.summary.is_some() && self.confirmed
    }

    pub fn delete(&mut self) -> Effects {
        if self.phase == Phase::Submitting {
            return Effects::none();
        }
        let Some(id) = self.summary.as_ref().map(|a| a.id) else {
            self.banner = Some(ValidationError::NoAccountLoaded.into());
            return Effects::none();
        };
        if !self.can_delete() {
            self.banner = Some(ValidationError::DeletionNotConfirmed.into());
            return Effects::none();
        }
        self.banner = None;
        self.phase = Phase::Submitting;
        Effects::request(ApiRequest::DeleteAccount(id))
    }

    fn clear(&mut self) {
        self.account_id.clear();
        self.summary = None;
        self.confirmed = false;
        self.phase = Phase::Idle;
        self.focus = 0;
    }

    pub fn reset(&mut self) {
        self.clear();
        self.banner = None;
    }

    fn activate(&mut self) -> Effects {
        match self.focus() {
            DeleteFocus::AccountId | DeleteFocus::Search => self.search(),
            DeleteFocus::Confirm => {
                self.toggle_confirmation();
                Effects::none()
            }
            DeleteFocus::Reset => {
                self.reset();
                Effects::none()
            }
            DeleteFocus::Delete => self.delete(),
        }
    }
}

impl Screen for DeleteAccountForm {
    fn handle(&mut self, input: FormInput) -> Effects {
        let focus = self.focus();
        let len = self.slots().len();
        match input {
            FormInput::Char(c) => match focus {
                DeleteFocus::AccountId => self.account_id.push(c),
                DeleteFocus::Confirm if c == ' ' => self.toggle_confirmation(),
                _ => {}
            },
            FormInput::Backspace => {
                if focus == DeleteFocus::AccountId {
                    self.account_id.pop();
                }
            }
            FormInput::NextField | FormInput::Down => self.focus = focus_next(self.focus, len),
            FormInput::PrevField | FormInput::Up => self.focus = focus_prev(self.focus, len),
            FormInput::Toggle => {
                if focus == DeleteFocus::Confirm {
                    self.toggle_confirmation();
                }
            }
            FormInput::Activate => return self.activate(),
            FormInput::Reset => self.reset(),
        }
        Effects::none()
    }

    fn complete(&mut self, request: &ApiRequest, outcome: Outcome) -> Effects {
        match (request, outcome) {
            (ApiRequest::FetchAccount(_), Ok(ApiReply::Account(account))) => {
                self.summary = Some(account);
                self.phase = Phase::Found;
                self.banner = Some(Banner::success("Account found"));
            }
            (ApiRequest::FetchAccount(_), Err(err)) => {
                self.summary = None;
                self.phase = Phase::NotFound;
                self.focus = 0;
                self.banner = Some(Banner::error(err.banner_text("Account not found")));
            }
            (ApiRequest::DeleteAccount(id), Ok(ApiReply::Ack(ack))) => {
                tracing::info!(user_id = *id, "account removed from console state");
                self.clear();
                let text = ack.message.unwrap_or_else(|| "Account deleted".to_string());
                self.banner = Some(Banner::success(text));
                return Effects::none().changed();
            }
            (ApiRequest::DeleteAccount(_), Err(err)) => {
                self.phase = Phase::Found;
                self.banner = Some(Banner::error(err.banner_text("Could not delete the account")));
            }
            (request, _) => {
                tracing::debug!(request = request.kind(), "unexpected completion on delete screen");
            }
        }
        Effects::none()
    }

    fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    fn wants_text(&self) -> bool {
        self.focus() == DeleteFocus::AccountId
    }
}
