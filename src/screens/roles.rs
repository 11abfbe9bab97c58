//! Incremental role grants and revocations for one account.
//!
//! The add list offers catalog roles the account does not hold and the
//! remove list offers the ones it does, so the two can never overlap.
//! Each list has its own selection and its own submit action.

use super::{Effects, FormInput, Screen};
use crate::api::{Account, AccountId, Role};
use crate::app::dispatch::{ApiReply, ApiRequest, Outcome};
use crate::app::form::{
    Banner, CatalogState, Phase, Selection, TextInput, focus_next, focus_prev,
};
use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RolesFocus {
    AccountId,
    Search,
    AddList,
    Grant,
    RemoveList,
    Revoke,
    Refresh,
    Reset,
}

static SEARCH_SLOTS: [RolesFocus; 3] = [RolesFocus::AccountId, RolesFocus::Search, RolesFocus::Reset];
static LOADED_SLOTS: [RolesFocus; 8] = [
    RolesFocus::AccountId,
    RolesFocus::Search,
    RolesFocus::AddList,
    RolesFocus::Grant,
    RolesFocus::RemoveList,
    RolesFocus::Revoke,
    RolesFocus::Refresh,
    RolesFocus::Reset,
];

#[derive(Clone, Debug, Default)]
pub struct RolesManager {
    pub account_id: TextInput,
    pub account: Option<Account>,
    /// Roles the account currently holds, as last reported by the server.
    pub held: Vec<Role>,
    /// Full role catalog.
    pub catalog: Vec<Role>,
    pub catalog_state: CatalogState,
    pub to_add: Selection,
    pub to_remove: Selection,
    pub phase: Phase,
    pub granting: bool,
    pub revoking: bool,
    pub banner: Option<Banner>,
    resyncing: bool,
    focus: usize,
}

impl RolesManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog roles the account does not hold.
    pub fn add_candidates(&self) -> Vec<Role> {
        self.catalog
            .iter()
            .filter(|r| !self.held.iter().any(|h| h.id == r.id))
            .cloned()
            .collect()
    }

    pub fn remove_candidates(&self) -> &[Role] {
        &self.held
    }

    fn slots(&self) -> &'static [RolesFocus] {
        if self.account.is_some() { &LOADED_SLOTS } else { &SEARCH_SLOTS }
    }

    pub fn focus(&self) -> RolesFocus {
        let slots = self.slots();
        slots[self.focus.min(slots.len() - 1)]
    }

    fn loaded_id(&self) -> Option<AccountId> {
        self.account.as_ref().map(|a| a.id)
    }

    /// Account targeted by grant and revoke; only a settled search counts.
    fn found_id(&self) -> Option<AccountId> {
        self.loaded_id().filter(|_| self.phase == Phase::Found)
    }

    fn mutating(&self) -> bool {
        self.granting || self.revoking
    }

    pub fn search(&mut self) -> Effects {
        if self.phase == Phase::Searching || self.mutating() {
            return Effects::none();
        }
        match self.account_id.account_id() {
            Ok(id) => {
                self.banner = None;
                self.resyncing = false;
                self.phase = Phase::Searching;
                Effects::request(ApiRequest::FetchAccountWithRoles(id))
            }
            Err(err) => {
                self.banner = Some(err.into());
                Effects::none()
            }
        }
    }

    /// Re-run the search for the loaded account.
    pub fn refresh(&mut self) -> Effects {
        if self.mutating() {
            return Effects::none();
        }
        match self.loaded_id() {
            Some(id) if self.phase != Phase::Searching => {
                self.phase = Phase::Searching;
                Effects::request(ApiRequest::FetchAccountWithRoles(id))
            }
            Some(_) => Effects::none(),
            None => self.search(),
        }
    }

    pub fn grant(&mut self) -> Effects {
        if self.granting {
            return Effects::none();
        }
        let Some(id) = self.found_id() else {
            self.banner = Some(ValidationError::NoAccountLoaded.into());
            return Effects::none();
        };
        if self.to_add.is_empty() {
            self.banner = Some(ValidationError::NothingToGrant.into());
            return Effects::none();
        }
        self.banner = None;
        self.granting = true;
        Effects::request(ApiRequest::GrantRoles { id, roles: self.to_add.chosen().to_vec() })
    }

    pub fn revoke(&mut self) -> Effects {
        if self.revoking {
            return Effects::none();
        }
        let Some(id) = self.found_id() else {
            self.banner = Some(ValidationError::NoAccountLoaded.into());
            return Effects::none();
        };
        if self.to_remove.is_empty() {
            self.banner = Some(ValidationError::NothingToRevoke.into());
            return Effects::none();
        }
        self.banner = None;
        self.revoking = true;
        Effects::request(ApiRequest::RevokeRoles { id, roles: self.to_remove.chosen().to_vec() })
    }

    pub fn reset(&mut self) {
        self.account_id.clear();
        self.account = None;
        self.held.clear();
        self.to_add = Selection::default();
        self.to_remove = Selection::default();
        self.phase = Phase::Idle;
        self.banner = None;
        self.resyncing = false;
        self.focus = 0;
    }

    fn prune_selections(&mut self) {
        let add = self.add_candidates();
        self.to_add.retain_offered(&add);
        self.to_remove.retain_offered(&self.held);
    }

    fn toggle_at_cursor(&mut self) {
        match self.focus() {
            RolesFocus::AddList => {
                if let Some(role) = self.add_candidates().get(self.to_add.cursor()) {
                    self.to_add.toggle(role.id);
                }
            }
            RolesFocus::RemoveList => {
                if let Some(role) = self.held.get(self.to_remove.cursor()) {
                    self.to_remove.toggle(role.id);
                }
            }
            _ => {}
        }
    }

    fn activate(&mut self) -> Effects {
        match self.focus() {
            RolesFocus::AccountId | RolesFocus::Search => self.search(),
            RolesFocus::AddList | RolesFocus::RemoveList => {
                self.toggle_at_cursor();
                Effects::none()
            }
            RolesFocus::Grant => self.grant(),
            RolesFocus::Revoke => self.revoke(),
            RolesFocus::Refresh => self.refresh(),
            RolesFocus::Reset => {
                self.reset();
                Effects::none()
            }
        }
    }

    fn resync(&mut self, id: AccountId, banner: Banner) -> Effects {
        self.banner = Some(banner);
        self.resyncing = true;
        self.phase = Phase::Searching;
        Effects::request(ApiRequest::FetchAccountWithRoles(id)).changed()
    }
}

impl Screen for RolesManager {
    fn setup(&mut self) -> Effects {
        self.catalog_state = CatalogState::Loading;
        Effects::request(ApiRequest::LoadCatalog)
    }

    fn handle(&mut self, input: FormInput) -> Effects {
        let focus = self.focus();
        let len = self.slots().len();
        match input {
            FormInput::Char(c) => match focus {
                RolesFocus::AccountId => self.account_id.push(c),
                RolesFocus::AddList | RolesFocus::RemoveList if c == ' ' => self.toggle_at_cursor(),
                _ => {}
            },
            FormInput::Backspace => {
                if focus == RolesFocus::AccountId {
                    self.account_id.pop();
                }
            }
            FormInput::NextField => self.focus = focus_next(self.focus, len),
            FormInput::PrevField => self.focus = focus_prev(self.focus, len),
            FormInput::Up => match focus {
                RolesFocus::AddList => self.to_add.move_up(),
                RolesFocus::RemoveList => self.to_remove.move_up(),
                _ => self.focus = focus_prev(self.focus, len),
            },
            FormInput::Down => match focus {
                RolesFocus::AddList => {
                    let n = self.add_candidates().len();
                    self.to_add.move_down(n);
                }
                RolesFocus::RemoveList => self.to_remove.move_down(self.held.len()),
                _ => self.focus = focus_next(self.focus, len),
            },
            FormInput::Toggle => self.toggle_at_cursor(),
            FormInput::Activate => return self.activate(),
            FormInput::Reset => self.reset(),
        }
        Effects::none()
    }

    fn complete(&mut self, request: &ApiRequest, outcome: Outcome) -> Effects {
        match (request, outcome) {
            (ApiRequest::LoadCatalog, Ok(ApiReply::Catalog(roles))) => {
                self.catalog = roles;
                self.catalog_state = CatalogState::Ready;
                self.prune_selections();
            }
            (ApiRequest::LoadCatalog, Err(err)) => {
                tracing::warn!(error = %err, "role catalog unavailable");
                self.catalog_state = CatalogState::Unavailable(err.to_string());
            }
            (ApiRequest::FetchAccountWithRoles(_), Ok(ApiReply::AccountWithRoles { account, roles })) => {
                self.account = Some(account);
                self.held = roles;
                self.phase = Phase::Found;
                self.prune_selections();
                if !self.resyncing {
                    self.banner = Some(Banner::success("Account and roles loaded"));
                }
                self.resyncing = false;
            }
            (ApiRequest::FetchAccountWithRoles(_), Err(err)) => {
                self.account = None;
                self.held.clear();
                self.to_add = Selection::default();
                self.to_remove = Selection::default();
                self.phase = Phase::NotFound;
                self.resyncing = false;
                self.focus = 0;
                self.banner = Some(Banner::error(err.banner_text("Account not found")));
            }
            (ApiRequest::GrantRoles { id, .. }, Ok(ApiReply::Ack(ack))) => {
                self.granting = false;
                self.to_add.clear();
                let text = ack.message.unwrap_or_else(|| "Roles granted".to_string());
                return self.resync(*id, Banner::success(text));
            }
            (ApiRequest::GrantRoles { .. }, Err(err)) => {
                self.granting = false;
                self.banner = Some(Banner::error(err.banner_text("Could not grant the roles")));
            }
            (ApiRequest::RevokeRoles { id, .. }, Ok(ApiReply::Ack(ack))) => {
                self.revoking = false;
                self.to_remove.clear();
                let text = ack.message.unwrap_or_else(|| "Roles revoked".to_string());
                return self.resync(*id, Banner::success(text));
            }
            (ApiRequest::RevokeRoles { .. }, Err(err)) => {
                self.revoking = false;
                self.banner = Some(Banner::error(err.banner_text("Could not revoke the roles")));
            }
            (request, _) => {
                tracing::debug!(request = request.kind(), "unexpected completion on roles screen");
            }
        }
        Effects::none()
    }

    fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    fn wants_text(&self) -> bool {
        self.focus() == RolesFocus::AccountId
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StatusMessage;
    use crate::error::ApiError;

    fn roles(ids: &[u64]) -> Vec<Role> {
        ids.iter().map(|id| Role::new(*id, format!("Role {id}"))).collect()
    }

    fn account(id: AccountId, held: &[u64]) -> Account {
        Account {
            id,
            name: Some("Sam".into()),
            login: Some("sam".into()),
            email: None,
            active: true,
            role_ids: held.to_vec(),
        }
    }

    fn loaded(id: AccountId, held: &[u64], catalog: &[u64]) -> RolesManager {
        let mut m = RolesManager::new();
        let fx = m.setup();
        m.complete(&fx.requests[0], Ok(ApiReply::Catalog(roles(catalog))));
        m.account_id.set(id.to_string());
        let fx = m.search();
        assert_eq!(fx.requests, vec![ApiRequest::FetchAccountWithRoles(id)]);
        let reply = ApiReply::AccountWithRoles { account: account(id, held), roles: roles(held) };
        m.complete(&fx.requests[0], Ok(reply));
        m
    }

    fn ids(list: &[Role]) -> Vec<u64> {
        list.iter().map(|r| r.id).collect()
    }

    #[test]
    fn candidates_split_catalog_by_membership() {
        let m = loaded(42, &[1, 2], &[1, 2, 3]);
        assert_eq!(ids(&m.add_candidates()), vec![3]);
        assert_eq!(ids(m.remove_candidates()), vec![1, 2]);
        assert_eq!(m.banner, Some(Banner::success("Account and roles loaded")));
    }

    #[test]
    fn candidate_sets_are_disjoint() {
        let cases: [(&[u64], &[u64]); 4] = [
            (&[], &[1, 2, 3]),
            (&[1, 2, 3], &[1, 2, 3]),
            (&[2, 9], &[1, 2, 3]),
            (&[5], &[]),
        ];
        for (held, catalog) in cases {
            let m = loaded(1, held, catalog);
            let add = ids(&m.add_candidates());
            let remove = ids(m.remove_candidates());
            assert!(add.iter().all(|id| !remove.contains(id)), "{held:?} vs {catalog:?}");
        }
    }

    #[test]
    fn empty_selections_are_rejected_locally() {
        let mut m = loaded(42, &[1], &[1, 2]);
        assert!(m.grant().requests.is_empty());
        assert_eq!(m.banner, Some(Banner::error("Select at least one role to grant")));
        assert!(m.revoke().requests.is_empty());
        assert_eq!(m.banner, Some(Banner::error("Select at least one role to revoke")));
        assert!(!m.granting && !m.revoking);
    }

    #[test]
    fn grant_resyncs_and_clears_selection() {
        let mut m = loaded(42, &[1, 2], &[1, 2, 3]);
        m.to_add.toggle(3);
        let fx = m.grant();
        assert_eq!(fx.requests, vec![ApiRequest::GrantRoles { id: 42, roles: vec![3] }]);
        assert!(m.granting);

        let ack = StatusMessage { message: Some("Groupes ajoutés".into()) };
        let fx = m.complete(&fx.requests[0], Ok(ApiReply::Ack(ack)));
        assert!(fx.changed);
        assert_eq!(fx.requests, vec![ApiRequest::FetchAccountWithRoles(42)]);
        assert!(m.to_add.is_empty());
        assert!(!m.granting);

        let reply =
            ApiReply::AccountWithRoles { account: account(42, &[1, 2, 3]), roles: roles(&[1, 2, 3]) };
        m.complete(&fx.requests[0], Ok(reply));
        assert_eq!(ids(&m.held), vec![1, 2, 3]);
        assert!(m.add_candidates().is_empty());
        assert_eq!(m.banner, Some(Banner::success("Groupes ajoutés")));
    }

    #[test]
    fn revoke_prunes_stale_selection_after_resync() {
        let mut m = loaded(42, &[1, 2], &[1, 2, 3]);
        m.to_remove.toggle(1);
        m.to_add.toggle(3);
        let fx = m.revoke();
        let fx = m.complete(&fx.requests[0], Ok(ApiReply::Ack(StatusMessage::default())));
        assert_eq!(m.banner, Some(Banner::success("Roles revoked")));
        // Someone else granted 3 in the meantime.
        let reply = ApiReply::AccountWithRoles { account: account(42, &[2, 3]), roles: roles(&[2, 3]) };
        m.complete(&fx.requests[0], Ok(reply));
        assert!(m.to_remove.is_empty());
        assert!(m.to_add.is_empty());
        assert_eq!(ids(&m.add_candidates()), vec![1]);
    }

    #[test]
    fn failed_search_clears_account_and_roles() {
        let mut m = loaded(42, &[1], &[1, 2]);
        m.account_id.set("43");
        let fx = m.search();
        let err = ApiError::Status { method: "GET", path: "/users/43/roles".into(), status: 404, detail: None };
        m.complete(&fx.requests[0], Err(err));
        assert!(m.account.is_none());
        assert!(m.held.is_empty());
        assert_eq!(m.phase, Phase::NotFound);
        assert_eq!(m.focus(), RolesFocus::AccountId);
    }

    #[test]
    fn grant_failure_keeps_selection() {
        let mut m = loaded(42, &[], &[1, 2]);
        m.to_add.toggle(2);
        let fx = m.grant();
        let err = ApiError::Status {
            method: "POST",
            path: "/users/42/roles".into(),
            status: 400,
            detail: Some("Groupe inconnu".into()),
        };
        m.complete(&fx.requests[0], Err(err));
        assert_eq!(m.to_add.chosen(), &[2]);
        assert_eq!(m.banner, Some(Banner::error("Groupe inconnu")));
    }

    #[test]
    fn mutations_wait_for_a_settled_search() {
        let mut m = loaded(42, &[1, 2], &[1, 2, 3]);
        m.to_add.toggle(3);
        m.to_remove.toggle(1);
        m.account_id.set("43");
        let fx = m.search();
        assert_eq!(fx.requests, vec![ApiRequest::FetchAccountWithRoles(43)]);
        assert_eq!(m.phase, Phase::Searching);

        assert!(m.grant().requests.is_empty());
        assert!(m.revoke().requests.is_empty());
        assert!(!m.granting && !m.revoking);
        assert_eq!(m.banner, Some(Banner::error("Search for an account first")));
    }

    #[test]
    fn search_and_refresh_wait_for_mutations() {
        let mut m = loaded(42, &[1, 2], &[1, 2, 3]);
        m.to_add.toggle(3);
        let grant = m.grant();
        assert_eq!(grant.requests, vec![ApiRequest::GrantRoles { id: 42, roles: vec![3] }]);

        m.account_id.set("43");
        assert!(m.search().requests.is_empty());
        assert!(m.refresh().requests.is_empty());
        assert_eq!(m.phase, Phase::Found);

        let fx = m.complete(&grant.requests[0], Ok(ApiReply::Ack(StatusMessage::default())));
        assert_eq!(fx.requests, vec![ApiRequest::FetchAccountWithRoles(42)]);
    }

    #[test]
    fn keyboard_selects_from_add_list() {
        let mut m = loaded(42, &[1], &[1, 2, 3]);
        m.handle(FormInput::NextField);
        m.handle(FormInput::NextField);
        assert_eq!(m.focus(), RolesFocus::AddList);
        m.handle(FormInput::Down);
        m.handle(FormInput::Toggle);
        assert_eq!(m.to_add.chosen(), &[3]);
        m.handle(FormInput::NextField);
        let fx = m.handle(FormInput::Activate);
        assert_eq!(fx.requests, vec![ApiRequest::GrantRoles { id: 42, roles: vec![3] }]);
    }
}
