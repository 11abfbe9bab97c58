//! Account listing.
//!
//! The directory API has no enumeration endpoint, so a freshly mounted
//! listing reports that plainly and holds no rows. Filtering and the
//! per-row peeks work on whatever rows the view holds.

use super::{Effects, FormInput, Screen};
use crate::api::{Account, AccountId, Role};
use crate::app::dispatch::{ApiReply, ApiRequest, Outcome};
use crate::app::form::{Banner, TextInput};
use crate::search::filter_accounts;

pub const UNSUPPORTED_NOTICE: &str = "Listing accounts is not supported by the directory API";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingStatus {
    Unsupported,
    Loaded,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListingFocus {
    #[default]
    Filter,
    Table,
}

#[derive(Clone, Debug)]
pub struct ListingView {
    pub filter: TextInput,
    pub accounts: Vec<Account>,
    pub status: ListingStatus,
    pub cursor: usize,
    pub detail: Option<Account>,
    pub peeked_roles: Option<(AccountId, Vec<Role>)>,
    pub banner: Option<Banner>,
    pub focus: ListingFocus,
}

impl Default for ListingView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingView {
    pub fn new() -> Self {
        Self {
            filter: TextInput::new(),
            accounts: Vec::new(),
            status: ListingStatus::Unsupported,
            cursor: 0,
            detail: None,
            peeked_roles: None,
            banner: None,
            focus: ListingFocus::Filter,
        }
    }

    /// A listing over rows obtained elsewhere.
    pub fn with_rows(accounts: Vec<Account>) -> Self {
        Self { accounts, status: ListingStatus::Loaded, ..Self::new() }
    }

    /// Rows matching the current filter.
    pub fn visible(&self) -> Vec<&Account> {
        filter_accounts(&self.accounts, self.filter.value())
    }

    pub fn selected(&self) -> Option<&Account> {
        self.visible().get(self.cursor).copied()
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn peek_detail(&mut self) -> Effects {
        match self.selected().map(|a| a.id) {
            Some(id) => Effects::request(ApiRequest::FetchAccount(id)),
            None => Effects::none(),
        }
    }

    pub fn peek_roles(&mut self) -> Effects {
        match self.selected().map(|a| a.id) {
            Some(id) => Effects::request(ApiRequest::FetchRoles(id)),
            None => Effects::none(),
        }
    }

    pub fn reset(&mut self) {
        self.filter.clear();
        self.cursor = 0;
        self.detail = None;
        self.peeked_roles = None;
        self.focus = ListingFocus::Filter;
    }
}

impl Screen for ListingView {
    fn setup(&mut self) -> Effects {
        if self.status == ListingStatus::Unsupported {
            self.banner = Some(Banner::info(UNSUPPORTED_NOTICE));
        }
        Effects::none()
    }

    fn handle(&mut self, input: FormInput) -> Effects {
        match (input, self.focus) {
            (FormInput::Char(c), ListingFocus::Filter) => {
                self.filter.push(c);
                self.clamp_cursor();
            }
            (FormInput::Backspace, ListingFocus::Filter) => {
                self.filter.pop();
                self.clamp_cursor();
            }
            (FormInput::NextField | FormInput::PrevField, _) => {
                self.focus = match self.focus {
                    ListingFocus::Filter => ListingFocus::Table,
                    ListingFocus::Table => ListingFocus::Filter,
                };
            }
            (FormInput::Up, ListingFocus::Table) => self.cursor = self.cursor.saturating_sub(1),
            (FormInput::Down, ListingFocus::Table) => {
                if self.cursor + 1 < self.visible().len() {
                    self.cursor += 1;
                }
            }
            (FormInput::Down, ListingFocus::Filter) => self.focus = ListingFocus::Table,
            (FormInput::Activate, ListingFocus::Table) => return self.peek_detail(),
            (FormInput::Toggle | FormInput::Char(' '), ListingFocus::Table) => return self.peek_roles(),
            (FormInput::Reset, _) => self.reset(),
            _ => {}
        }
        Effects::none()
    }

    fn complete(&mut self, request: &ApiRequest, outcome: Outcome) -> Effects {
        match (request, outcome) {
            (ApiRequest::FetchAccount(_), Ok(ApiReply::Account(account))) => {
                self.detail = Some(account);
            }
            (ApiRequest::FetchAccount(_), Err(err)) => {
                self.detail = None;
                self.banner = Some(Banner::error(err.banner_text("Account not found")));
            }
            (ApiRequest::FetchRoles(id), Ok(ApiReply::Roles(roles))) => {
                self.peeked_roles = Some((*id, roles));
            }
            (ApiRequest::FetchRoles(id), Err(err)) => {
                tracing::warn!(user_id = *id, error = %err, "role peek failed");
                self.peeked_roles = Some((*id, Vec::new()));
            }
            (request, _) => {
                tracing::debug!(request = request.kind(), "unexpected completion on listing screen");
            }
        }
        Effects::none()
    }

    fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    fn wants_text(&self) -> bool {
        self.focus == ListingFocus::Filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::form::BannerKind;
    use crate::error::ApiError;

    fn row(id: AccountId, login: &str) -> Account {
        Account {
            id,
            name: None,
            login: Some(login.into()),
            email: Some(format!("{login}@corp.fr")),
            active: true,
            role_ids: vec![],
        }
    }

    #[test]
    fn mounted_listing_reports_unsupported_without_fetching() {
        let mut view = ListingView::new();
        let fx = view.setup();
        assert!(fx.requests.is_empty());
        assert!(view.accounts.is_empty());
        let banner = view.banner.as_ref().unwrap();
        assert_eq!(banner.kind, BannerKind::Info);
        assert_eq!(banner.text, UNSUPPORTED_NOTICE);
    }

    #[test]
    fn table_actions_on_empty_rows_do_nothing() {
        let mut view = ListingView::new();
        view.handle(FormInput::NextField);
        assert!(view.handle(FormInput::Activate).requests.is_empty());
        assert!(view.handle(FormInput::Toggle).requests.is_empty());
    }

    #[test]
    fn filter_then_peek_selected_row() {
        let mut view = ListingView::with_rows(vec![row(1, "alice"), row(2, "bob"), row(3, "bobby")]);
        for c in "BOB".chars() {
            view.handle(FormInput::Char(c));
        }
        assert_eq!(view.visible().len(), 2);
        view.handle(FormInput::Down);
        view.handle(FormInput::Down);
        assert_eq!(view.selected().map(|a| a.id), Some(3));
        let fx = view.handle(FormInput::Activate);
        assert_eq!(fx.requests, vec![ApiRequest::FetchAccount(3)]);
        let fx = view.handle(FormInput::Toggle);
        assert_eq!(fx.requests, vec![ApiRequest::FetchRoles(3)]);
    }

    #[test]
    fn failed_role_peek_yields_empty_list() {
        let mut view = ListingView::with_rows(vec![row(8, "eve")]);
        let err = ApiError::Status { method: "GET", path: "/users/8/roles".into(), status: 500, detail: None };
        view.complete(&ApiRequest::FetchRoles(8), Err(err));
        assert_eq!(view.peeked_roles, Some((8, vec![])));
    }

    #[test]
    fn reset_clears_filter_and_panels() {
        let mut view = ListingView::with_rows(vec![row(1, "alice")]);
        view.filter.set("zz");
        view.complete(&ApiRequest::FetchRoles(1), Ok(ApiReply::Roles(vec![Role::new(4, "Sales")])));
        view.handle(FormInput::Reset);
        assert_eq!(view.filter.value(), "");
        assert!(view.peeked_roles.is_none());
        assert_eq!(view.visible().len(), 1);
    }
}
