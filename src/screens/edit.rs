//! Search-and-update form.
//!
//! A successful search fills a shadow copy of the account. On submit only
//! fields whose trimmed value is non-empty are sent: an empty field means
//! "leave unchanged", never "clear".

use super::{Effects, FormInput, Screen};
use crate::api::{Account, AccountId, Role, UpdateAccountRequest};
use crate::app::dispatch::{ApiReply, ApiRequest, Outcome};
use crate::app::form::{
    Banner, CatalogState, Phase, Selection, TextInput, focus_next, focus_prev,
};
use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditField {
    Name,
    Login,
    Email,
    Password,
}

impl EditField {
    pub const ALL: [EditField; 4] = [
        EditField::Name,
        EditField::Login,
        EditField::Email,
        EditField::Password,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::Name => "Full name",
            EditField::Login => "Login",
            EditField::Email => "Email",
            EditField::Password => "New password",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditFocus {
    AccountId,
    Search,
    Field(EditField),
    Roles,
    Reset,
    Submit,
}

static SEARCH_SLOTS: [EditFocus; 3] = [EditFocus::AccountId, EditFocus::Search, EditFocus::Reset];
static FOUND_SLOTS: [EditFocus; 9] = [
    EditFocus::AccountId,
    EditFocus::Search,
    EditFocus::Field(EditField::Name),
    EditFocus::Field(EditField::Login),
    EditFocus::Field(EditField::Email),
    EditFocus::Field(EditField::Password),
    EditFocus::Roles,
    EditFocus::Reset,
    EditFocus::Submit,
];

#[derive(Clone, Debug)]
pub struct UpdateAccountForm {
    pub account_id: TextInput,
    fields: [TextInput; 4],
    /// Capped catalog preview shown as a checklist.
    pub roles: Vec<Role>,
    /// Full role-id set to submit; may include roles outside the preview.
    pub selection: Selection,
    pub catalog: CatalogState,
    pub phase: Phase,
    /// Identifier of the account that was fetched. Submits always target it.
    pub loaded: Option<AccountId>,
    pub banner: Option<Banner>,
    resyncing: bool,
    focus: usize,
    preview_limit: usize,
}

impl UpdateAccountForm {
    pub fn new(preview_limit: usize) -> Self {
        let mut fields: [TextInput; 4] = Default::default();
        fields[EditField::Password.index()] = TextInput::masked();
        Self {
            account_id: TextInput::new(),
            fields,
            roles: Vec::new(),
            selection: Selection::default(),
            catalog: CatalogState::Loading,
            phase: Phase::Idle,
            loaded: None,
            banner: None,
            resyncing: false,
            focus: 0,
            preview_limit,
        }
    }

    pub fn field(&self, field: EditField) -> &TextInput {
        &self.fields[field.index()]
    }

    pub fn field_mut(&mut self, field: EditField) -> &mut TextInput {
        &mut self.fields[field.index()]
    }

    /// The edit section is shown only after a successful search.
    pub fn is_found(&self) -> bool {
        self.loaded.is_some()
    }

    fn slots(&self) -> &'static [EditFocus] {
        if self.is_found() { &FOUND_SLOTS } else { &SEARCH_SLOTS }
    }

    pub fn focus(&self) -> EditFocus {
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
                self.resyncing = false;
                self.phase = Phase::Searching;
                Effects::request(ApiRequest::FetchAccount(id))
            }
            Err(err) => {
                self.banner = Some(err.into());
                Effects::none()
            }
        }
    }

    /// Partial-update payload: exactly the non-blank fields, plus the role
    /// set when it is non-empty.
    pub fn build_changes(&self) -> UpdateAccountRequest {
        UpdateAccountRequest {
            name: self.field(EditField::Name).non_blank(),
            login: self.field(EditField::Login).non_blank(),
            email: self.field(EditField::Email).non_blank(),
            password: self.field(EditField::Password).non_blank(),
            groups: if self.selection.is_empty() {
                None
            } else {
                Some(self.selection.chosen().to_vec())
            },
        }
    }

    pub fn submit(&mut self) -> Effects {
        if self.phase == Phase::Submitting {
            return Effects::none();
        }
        let Some(id) = self.loaded.filter(|_| self.phase == Phase::Found) else {
            self.banner = Some(ValidationError::NoAccountLoaded.into());
            return Effects::none();
        };
        self.banner = None;
        self.phase = Phase::Submitting;
        Effects::request(ApiRequest::UpdateAccount { id, changes: self.build_changes() })
    }

    pub fn reset(&mut self) {
        self.account_id.clear();
        for f in self.fields.iter_mut() {
            f.clear();
        }
        self.selection.clear();
        self.phase = Phase::Idle;
        self.loaded = None;
        self.banner = None;
        self.resyncing = false;
        self.focus = 0;
    }

    fn load(&mut self, account: &Account) {
        self.field_mut(EditField::Name).set(account.name_or_empty());
        self.field_mut(EditField::Login).set(account.login_or_empty());
        self.field_mut(EditField::Email).set(account.email_or_empty());
        self.field_mut(EditField::Password).clear();
        self.selection.set(account.role_ids.clone());
        self.loaded = Some(account.id);
        self.phase = Phase::Found;
    }

    fn toggle_role_at_cursor(&mut self) {
        if let Some(role) = self.roles.get(self.selection.cursor()) {
            self.selection.toggle(role.id);
        }
    }

    fn activate(&mut self) -> Effects {
        match self.focus() {
            EditFocus::AccountId | EditFocus::Search => self.search(),
            EditFocus::Field(_) | EditFocus::Submit => self.submit(),
            EditFocus::Roles => {
                self.toggle_role_at_cursor();
                Effects::none()
            }
            EditFocus::Reset => {
                self.reset();
                Effects::none()
            }
        }
    }
}

impl Screen for UpdateAccountForm {
    fn setup(&mut self) -> Effects {
        self.catalog = CatalogState::Loading;
        Effects::request(ApiRequest::LoadCatalog)
    }

    fn handle(&mut self, input: FormInput) -> Effects {
        let focus = self.focus();
        let len = self.slots().len();
        match input {
            FormInput::Char(c) => match focus {
                EditFocus::AccountId => self.account_id.push(c),
                EditFocus::Field(f) => self.field_mut(f).push(c),
                EditFocus::Roles if c == ' ' => self.toggle_role_at_cursor(),
                _ => {}
            },
            FormInput::Backspace => match focus {
                EditFocus::AccountId => self.account_id.pop(),
                EditFocus::Field(f) => self.field_mut(f).pop(),
                _ => {}
            },
            FormInput::NextField => self.focus = focus_next(self.focus, len),
            FormInput::PrevField => self.focus = focus_prev(self.focus, len),
            FormInput::Up => match focus {
                EditFocus::Roles => self.selection.move_up(),
                _ => self.focus = focus_prev(self.focus, len),
            },
            FormInput::Down => match focus {
                EditFocus::Roles => self.selection.move_down(self.roles.len()),
                _ => self.focus = focus_next(self.focus, len),
            },
            FormInput::Toggle => {
                if focus == EditFocus::Roles {
                    self.toggle_role_at_cursor();
                }
            }
            FormInput::Activate => return self.activate(),
            FormInput::Reset => self.reset(),
        }
        Effects::none()
    }

    fn complete(&mut self, request: &ApiRequest, outcome: Outcome) -> Effects {
        match (request, outcome) {
            (ApiRequest::LoadCatalog, Ok(ApiReply::Catalog(roles))) => {
                self.roles = roles.into_iter().take(self.preview_limit).collect();
                self.catalog = CatalogState::Ready;
            }
            (ApiRequest::LoadCatalog, Err(err)) => {
                tracing::warn!(error = %err, "role catalog unavailable");
                self.catalog = CatalogState::Unavailable(err.to_string());
            }
            (ApiRequest::FetchAccount(_), Ok(ApiReply::Account(account))) => {
                self.load(&account);
                if !self.resyncing {
                    self.banner = Some(Banner::success("Account loaded"));
                }
                self.resyncing = false;
            }
            (ApiRequest::FetchAccount(_), Err(err)) => {
                self.loaded = None;
                self.phase = Phase::NotFound;
                self.resyncing = false;
                self.focus = 0;
                self.banner = Some(Banner::error(err.banner_text("Account not found")));
            }
            (ApiRequest::UpdateAccount { id, .. }, Ok(ApiReply::Ack(ack))) => {
                let text = ack.message.unwrap_or_else(|| "Account updated".to_string());
                self.banner = Some(Banner::success(text));
                self.resyncing = true;
                self.phase = Phase::Searching;
                return Effects::request(ApiRequest::FetchAccount(*id)).changed();
            }
            (ApiRequest::UpdateAccount { .. }, Err(err)) => {
                self.phase = Phase::Found;
                self.banner = Some(Banner::error(err.banner_text("Could not update the account")));
            }
            (request, _) => {
                tracing::debug!(request = request.kind(), "unexpected completion on update screen");
            }
        }
        Effects::none()
    }

    fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    fn wants_text(&self) -> bool {
        matches!(self.focus(), EditFocus::AccountId | EditFocus::Field(_))
    }
}
