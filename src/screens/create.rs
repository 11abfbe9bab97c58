//! Create-account form.
//!
//! Builds the nested account descriptor expected by `POST /users/`. The role
//! checklist only offers a capped preview of the catalog.

use super::{Effects, FormInput, Screen};
use crate::api::{CreateAccountRequest, CreatedAccount, ExternalIds, Role, UserAccount};
use crate::app::dispatch::{ApiReply, ApiRequest, Outcome};
use crate::app::form::{Banner, CatalogState, Selection, TextInput, focus_next, focus_prev};
use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateField {
    Login,
    Email,
    Name,
    Password,
    DisplayName,
    PrincipalId,
    DistinguishedName,
    Guid,
}

impl CreateField {
    pub const ALL: [CreateField; 8] = [
        CreateField::Login,
        CreateField::Email,
        CreateField::Name,
        CreateField::Password,
        CreateField::DisplayName,
        CreateField::PrincipalId,
        CreateField::DistinguishedName,
        CreateField::Guid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CreateField::Login => "Login name *",
            CreateField::Email => "Email",
            CreateField::Name => "Full name",
            CreateField::Password => "Password (generated if empty)",
            CreateField::DisplayName => "Directory display name",
            CreateField::PrincipalId => "User principal ID",
            CreateField::DistinguishedName => "Distinguished name (DN)",
            CreateField::Guid => "GUID",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Focusable element of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateFocus {
    Field(CreateField),
    Roles,
    Reset,
    Submit,
}

const SLOTS: usize = CreateField::ALL.len() + 3;

#[derive(Clone, Debug)]
pub struct CreateAccountForm {
    fields: [TextInput; 8],
    /// Capped preview of the catalog offered for selection.
    pub roles: Vec<Role>,
    pub selection: Selection,
    pub catalog: CatalogState,
    pub busy: bool,
    pub banner: Option<Banner>,
    focus: usize,
    preview_limit: usize,
}

impl CreateAccountForm {
    pub fn new(preview_limit: usize) -> Self {
        let mut fields: [TextInput; 8] = Default::default();
        fields[CreateField::Password.index()] = TextInput::masked();
        Self {
            fields,
            roles: Vec::new(),
            selection: Selection::default(),
            catalog: CatalogState::Loading,
            busy: false,
            banner: None,
            focus: 0,
            preview_limit,
        }
    }

    pub fn field(&self, field: CreateField) -> &TextInput {
        &self.fields[field.index()]
    }

    pub fn field_mut(&mut self, field: CreateField) -> &mut TextInput {
        &mut self.fields[field.index()]
    }

    pub fn focus(&self) -> CreateFocus {
        match self.focus {
            i if i < CreateField::ALL.len() => CreateFocus::Field(CreateField::ALL[i]),
            8 => CreateFocus::Roles,
            9 => CreateFocus::Reset,
            _ => CreateFocus::Submit,
        }
    }

    pub fn all_fields_empty(&self) -> bool {
        self.fields.iter().all(|f| f.value().is_empty())
    }

    /// Validate and assemble the request body.
    pub fn build_request(&self) -> Result<CreateAccountRequest, ValidationError> {
        let login = self
            .field(CreateField::Login)
            .non_blank()
            .ok_or(ValidationError::BlankLogin)?;
        let text = |f: CreateField| self.field(f).value().trim().to_string();
        Ok(CreateAccountRequest {
            user_account: UserAccount {
                login_name: login,
                other_ids: ExternalIds {
                    id: text(CreateField::DistinguishedName),
                    guid: text(CreateField::Guid),
                    up_id: text(CreateField::PrincipalId),
                    display_name: text(CreateField::DisplayName),
                },
            },
            name: self.field(CreateField::Name).non_blank(),
            email: self.field(CreateField::Email).non_blank(),
            password: self.field(CreateField::Password).non_blank(),
            groups: self.selection.chosen().to_vec(),
        })
    }

    pub fn submit(&mut self) -> Effects {
        if self.busy {
            return Effects::none();
        }
        match self.build_request() {
            Ok(request) => {
                self.banner = None;
                self.busy = true;
                Effects::request(ApiRequest::CreateAccount(request))
            }
            Err(err) => {
                self.banner = Some(err.into());
                Effects::none()
            }
        }
    }

    fn clear_fields(&mut self) {
        for f in self.fields.iter_mut() {
            f.clear();
        }
        self.selection.clear();
    }

    pub fn reset(&mut self) {
        self.clear_fields();
        self.banner = None;
        self.focus = 0;
    }

    fn toggle_role_at_cursor(&mut self) {
        if let Some(role) = self.roles.get(self.selection.cursor()) {
            self.selection.toggle(role.id);
        }
    }

    fn on_created(&mut self, created: &CreatedAccount) {
        let mut text = format!("Account created. ID: {}", created.user_id);
        if let Some(pw) = created.revealed_password() {
            text.push_str(&format!(", password: {pw}"));
        }
        self.clear_fields();
        self.banner = Some(Banner::success(text));
    }
}

impl Screen for CreateAccountForm {
    fn setup(&mut self) -> Effects {
        self.catalog = CatalogState::Loading;
        Effects::request(ApiRequest::LoadCatalog)
    }

    fn handle(&mut self, input: FormInput) -> Effects {
        let focus = self.focus();
        match input {
            FormInput::Char(c) => match focus {
                CreateFocus::Field(f) => self.field_mut(f).push(c),
                CreateFocus::Roles if c == ' ' => self.toggle_role_at_cursor(),
                _ => {}
            },
            FormInput::Backspace => {
                if let CreateFocus::Field(f) = focus {
                    self.field_mut(f).pop();
                }
            }
            FormInput::NextField => self.focus = focus_next(self.focus, SLOTS),
            FormInput::PrevField => self.focus = focus_prev(self.focus, SLOTS),
            FormInput::Up => match focus {
                CreateFocus::Roles => self.selection.move_up(),
                _ => self.focus = focus_prev(self.focus, SLOTS),
            },
            FormInput::Down => match focus {
                CreateFocus::Roles => self.selection.move_down(self.roles.len()),
                _ => self.focus = focus_next(self.focus, SLOTS),
            },
            FormInput::Toggle => {
                if focus == CreateFocus::Roles {
                    self.toggle_role_at_cursor();
                }
            }
            FormInput::Activate => match focus {
                CreateFocus::Roles => self.toggle_role_at_cursor(),
                CreateFocus::Reset => self.reset(),
                CreateFocus::Field(_) | CreateFocus::Submit => return self.submit(),
            },
            FormInput::Reset => self.reset(),
        }
        Effects::none()
    }

    fn complete(&mut self, request: &ApiRequest, outcome: Outcome) -> Effects {
        match (request, outcome) {
            (ApiRequest::LoadCatalog, Ok(ApiReply::Catalog(roles))) => {
                self.roles = roles.into_iter().take(self.preview_limit).collect();
                self.selection.retain_offered(&self.roles);
                self.catalog = CatalogState::Ready;
            }
            (ApiRequest::LoadCatalog, Err(err)) => {
                tracing::warn!(error = %err, "role catalog unavailable");
                self.catalog = CatalogState::Unavailable(err.to_string());
            }
            (ApiRequest::CreateAccount(_), Ok(ApiReply::Created(created))) => {
                self.busy = false;
                self.on_created(&created);
                return Effects::none().changed();
            }
            (ApiRequest::CreateAccount(_), Err(err)) => {
                self.busy = false;
                self.banner = Some(Banner::error(err.banner_text("Could not create the account")));
            }
            (request, _) => {
                tracing::debug!(request = request.kind(), "unexpected completion on create screen");
            }
        }
        Effects::none()
    }

    fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    fn wants_text(&self) -> bool {
        matches!(self.focus(), CreateFocus::Field(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn type_into(form: &mut CreateAccountForm, field: CreateField, text: &str) {
        for c in text.chars() {
            form.field_mut(field).push(c);
        }
    }

    fn catalog(n: u64) -> Vec<Role> {
        (1..=n).map(|i| Role::new(i, format!("role-{i}"))).collect()
    }

    #[test]
    fn blank_login_is_rejected_without_request() {
        for login in ["", "   ", "\t "] {
            let mut form = CreateAccountForm::new(12);
            form.field_mut(CreateField::Login).set(login);
            type_into(&mut form, CreateField::Email, "x@y.z");
            let fx = form.submit();
            assert!(fx.requests.is_empty(), "login {login:?} must not reach the network");
            assert!(!form.busy);
            assert_eq!(form.banner, Some(Banner::error("Login name is required")));
        }
    }

    #[test]
    fn setup_requests_catalog_and_caps_preview() {
        let mut form = CreateAccountForm::new(12);
        assert_eq!(form.setup().requests, vec![ApiRequest::LoadCatalog]);
        form.complete(&ApiRequest::LoadCatalog, Ok(ApiReply::Catalog(catalog(20))));
        assert_eq!(form.roles.len(), 12);
        assert_eq!(form.catalog, CatalogState::Ready);
    }

    #[test]
    fn catalog_failure_is_not_a_banner() {
        let mut form = CreateAccountForm::new(12);
        let err = ApiError::Status { method: "GET", path: "/groups/".into(), status: 503, detail: None };
        form.complete(&ApiRequest::LoadCatalog, Err(err));
        assert!(matches!(form.catalog, CatalogState::Unavailable(_)));
        assert!(form.banner.is_none());
    }

    #[test]
    fn request_includes_only_filled_optionals_and_selected_roles() {
        let mut form = CreateAccountForm::new(12);
        form.complete(&ApiRequest::LoadCatalog, Ok(ApiReply::Catalog(catalog(3))));
        type_into(&mut form, CreateField::Login, "  jdoe@example.com ");
        type_into(&mut form, CreateField::Name, "John Doe");
        type_into(&mut form, CreateField::Guid, "550e8400");
        form.selection.toggle(3);
        form.selection.toggle(1);

        let req = form.build_request().unwrap();
        assert_eq!(req.user_account.login_name, "jdoe@example.com");
        assert_eq!(req.user_account.other_ids.guid, "550e8400");
        assert_eq!(req.name.as_deref(), Some("John Doe"));
        assert_eq!(req.email, None);
        assert_eq!(req.password, None);
        assert_eq!(req.groups, vec![3, 1]);
    }

    #[test]
    fn success_echoes_generated_password_and_clears_form() {
        let mut form = CreateAccountForm::new(12);
        type_into(&mut form, CreateField::Login, "a@b.com");
        let fx = form.submit();
        assert_eq!(fx.requests.len(), 1);
        assert!(form.busy);

        let reply = CreatedAccount { user_id: 7, password: "Xk2!".into(), message: None, login: None };
        let fx = form.complete(&fx.requests[0], Ok(ApiReply::Created(reply)));
        assert!(fx.changed);
        assert!(!form.busy);
        let banner = form.banner.clone().unwrap();
        assert!(!banner.is_error());
        assert!(banner.text.contains("ID: 7"));
        assert!(banner.text.contains("Xk2!"));
        assert!(form.all_fields_empty());
        assert!(form.selection.is_empty());
    }

    #[test]
    fn masked_password_is_not_echoed() {
        let mut form = CreateAccountForm::new(12);
        type_into(&mut form, CreateField::Login, "a@b.com");
        type_into(&mut form, CreateField::Password, "secret");
        let fx = form.submit();
        let reply = CreatedAccount { user_id: 8, password: "***".into(), message: None, login: None };
        form.complete(&fx.requests[0], Ok(ApiReply::Created(reply)));
        let text = form.banner.unwrap().text;
        assert_eq!(text, "Account created. ID: 8");
    }

    #[test]
    fn failure_shows_detail_and_keeps_fields() {
        let mut form = CreateAccountForm::new(12);
        type_into(&mut form, CreateField::Login, "dup@b.com");
        let fx = form.submit();
        let err = ApiError::Status {
            method: "POST",
            path: "/users/".into(),
            status: 500,
            detail: Some("login already exists".into()),
        };
        let fx = form.complete(&fx.requests[0], Err(err));
        assert!(!fx.changed);
        assert_eq!(form.banner, Some(Banner::error("login already exists")));
        assert_eq!(form.field(CreateField::Login).value(), "dup@b.com");
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let mut form = CreateAccountForm::new(12);
        type_into(&mut form, CreateField::Login, "a@b.com");
        assert_eq!(form.submit().requests.len(), 1);
        assert!(form.submit().requests.is_empty());
    }

    #[test]
    fn keyboard_walks_to_roles_and_toggles() {
        let mut form = CreateAccountForm::new(12);
        form.complete(&ApiRequest::LoadCatalog, Ok(ApiReply::Catalog(catalog(3))));
        for _ in 0..8 {
            form.handle(FormInput::NextField);
        }
        assert_eq!(form.focus(), CreateFocus::Roles);
        assert!(!form.wants_text());
        form.handle(FormInput::Down);
        form.handle(FormInput::Toggle);
        assert_eq!(form.selection.chosen(), &[2]);
        form.handle(FormInput::PrevField);
        assert_eq!(form.focus(), CreateFocus::Field(CreateField::Guid));
    }
}
