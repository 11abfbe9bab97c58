//! Application state and entry glue.
//!
//! [`AppState`] is the shell: it owns the five screens, knows which one is
//! mounted, and turns screen [`Effects`] into tagged requests for the
//! dispatcher. It performs no I/O itself, so the whole console can be driven
//! from tests by feeding inputs and completions.
//!
pub mod dispatch;
pub mod form;
pub mod keymap;
pub mod theme;
pub mod update;

use std::time::Instant;

use crate::config::ConsoleConfig;
use crate::screens::{
    CreateAccountForm, DeleteAccountForm, Effects, FormInput, ListingView, RolesManager, Screen,
    UpdateAccountForm,
};
use dispatch::{ApiReply, ApiRequest, Completion};
use keymap::Keymap;
use theme::Theme;

/// Top-level screens, in header order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tab {
    Create,
    List,
    Update,
    Roles,
    Delete,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Create, Tab::List, Tab::Update, Tab::Roles, Tab::Delete];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Create => "Create account",
            Tab::List => "Accounts",
            Tab::Update => "Update account",
            Tab::Roles => "Roles",
            Tab::Delete => "Delete account",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Who asked for a request, so its completion can be routed back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Shell,
    /// A screen, as of a given mount epoch.
    Screen { tab: Tab, mount: u64 },
}

/// Backend connectivity as last reported by `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown,
    Healthy { platform_connected: bool },
    Unhealthy(String),
}

/// A request ready for the dispatcher.
pub type Outgoing = Vec<(Origin, ApiRequest)>;

pub struct AppState {
    pub started_at: Instant,
    pub active_tab: Tab,
    /// Bumped after every successful mutation.
    pub refresh_counter: u64,
    pub create: CreateAccountForm,
    pub listing: ListingView,
    pub update: UpdateAccountForm,
    pub roles: RolesManager,
    pub delete: DeleteAccountForm,
    pub backend: BackendStatus,
    pub theme: Theme,
    pub keymap: Keymap,
    pub role_preview: usize,
    pub base_url: String,
    mount: u64,
}

impl AppState {
    pub fn new(config: &ConsoleConfig, theme: Theme, keymap: Keymap) -> Self {
        let role_preview = config.role_preview;
        Self {
            started_at: Instant::now(),
            active_tab: Tab::Create,
            refresh_counter: 0,
            create: CreateAccountForm::new(role_preview),
            listing: ListingView::new(),
            update: UpdateAccountForm::new(role_preview),
            roles: RolesManager::new(),
            delete: DeleteAccountForm::new(),
            backend: BackendStatus::Unknown,
            theme,
            keymap,
            role_preview,
            base_url: config.base_url.clone(),
            mount: 0,
        }
    }

    /// Current mount epoch.
    pub fn mount(&self) -> u64 {
        self.mount
    }

    fn origin(&self) -> Origin {
        Origin::Screen { tab: self.active_tab, mount: self.mount }
    }

    /// Probe the backend and mount the initial screen.
    pub fn start(&mut self) -> Outgoing {
        let mut out = vec![(Origin::Shell, ApiRequest::Health)];
        out.extend(self.navigate(self.active_tab));
        out
    }

    /// Mount `tab` with fresh state and run its setup.
    pub fn navigate(&mut self, tab: Tab) -> Outgoing {
        self.mount += 1;
        self.active_tab = tab;
        let preview = self.role_preview;
        match tab {
            Tab::Create => self.create = CreateAccountForm::new(preview),
            Tab::List => self.listing = ListingView::new(),
            Tab::Update => self.update = UpdateAccountForm::new(preview),
            Tab::Roles => self.roles = RolesManager::new(),
            Tab::Delete => self.delete = DeleteAccountForm::new(),
        }
        tracing::debug!(screen = tab.title(), mount = self.mount, "screen mounted");
        let effects = self.screen_mut().setup();
        self.absorb(effects)
    }

    pub fn screen(&self) -> &dyn Screen {
        match self.active_tab {
            Tab::Create => &self.create,
            Tab::List => &self.listing,
            Tab::Update => &self.update,
            Tab::Roles => &self.roles,
            Tab::Delete => &self.delete,
        }
    }

    pub fn screen_mut(&mut self) -> &mut dyn Screen {
        match self.active_tab {
            Tab::Create => &mut self.create,
            Tab::List => &mut self.listing,
            Tab::Update => &mut self.update,
            Tab::Roles => &mut self.roles,
            Tab::Delete => &mut self.delete,
        }
    }

    pub fn handle_input(&mut self, input: FormInput) -> Outgoing {
        let effects = self.screen_mut().handle(input);
        self.absorb(effects)
    }

    /// Route a completion to whoever issued it. Completions for a screen that
    /// has since been unmounted are dropped.
    pub fn complete(&mut self, completion: Completion) -> Outgoing {
        let Completion { origin, request, outcome } = completion;
        match origin {
            Origin::Shell => {
                match outcome {
                    Ok(ApiReply::Health(report)) => {
                        self.backend = if report.is_healthy() {
                            BackendStatus::Healthy { platform_connected: report.platform_connected }
                        } else {
                            BackendStatus::Unhealthy(report.status)
                        };
                    }
                    Ok(_) => tracing::debug!(request = request.kind(), "unexpected shell completion"),
                    Err(err) => {
                        tracing::warn!(error = %err, "health probe failed");
                        self.backend = BackendStatus::Unhealthy(err.to_string());
                    }
                }
                Vec::new()
            }
            Origin::Screen { tab, mount } if tab == self.active_tab && mount == self.mount => {
                if let Err(err) = &outcome {
                    tracing::warn!(request = request.kind(), error = %err, "request failed");
                }
                let effects = self.screen_mut().complete(&request, outcome);
                self.absorb(effects)
            }
            Origin::Screen { tab, mount } => {
                tracing::debug!(
                    request = request.kind(),
                    screen = tab.title(),
                    mount,
                    current = self.mount,
                    "dropping stale completion"
                );
                Vec::new()
            }
        }
    }

    fn absorb(&mut self, effects: Effects) -> Outgoing {
        if effects.changed {
            self.notify_changed();
        }
        let origin = self.origin();
        effects.requests.into_iter().map(|r| (origin, r)).collect()
    }

    /// Record that server state changed so other screens refresh on mount.
    pub fn notify_changed(&mut self) {
        self.refresh_counter += 1;
        tracing::debug!(refresh_counter = self.refresh_counter, "directory changed");
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HealthReport, Role};

    fn app() -> AppState {
        AppState::new(&ConsoleConfig::default(), Theme::mocha(), Keymap::default())
    }

    #[test]
    fn start_probes_health_and_loads_catalog() {
        let mut app = app();
        let out = app.start();
        assert_eq!(out[0], (Origin::Shell, ApiRequest::Health));
        assert_eq!(out[1], (Origin::Screen { tab: Tab::Create, mount: 1 }, ApiRequest::LoadCatalog));
    }

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Tab::Delete.next(), Tab::Create);
        assert_eq!(Tab::Create.prev(), Tab::Delete);
        for t in Tab::ALL {
            assert_eq!(t.next().prev(), t);
        }
    }

    #[test]
    fn navigation_discards_form_state() {
        let mut app = app();
        app.start();
        app.navigate(Tab::Delete);
        app.handle_input(FormInput::Char('4'));
        assert_eq!(app.delete.account_id.value(), "4");
        app.navigate(Tab::Create);
        app.navigate(Tab::Delete);
        assert_eq!(app.delete.account_id.value(), "");
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut app = app();
        let out = app.start();
        let (origin, request) = out[1].clone();
        app.navigate(Tab::Update);
        let before = app.create.roles.len();
        let out = app.complete(Completion {
            origin,
            request,
            outcome: Ok(ApiReply::Catalog(vec![Role::new(1, "Sales")])),
        });
        assert!(out.is_empty());
        assert_eq!(app.create.roles.len(), before);
    }

    #[test]
    fn health_report_updates_backend_status() {
        let mut app = app();
        let report = HealthReport { status: "healthy".into(), platform_connected: false, timestamp: None };
        app.complete(Completion {
            origin: Origin::Shell,
            request: ApiRequest::Health,
            outcome: Ok(ApiReply::Health(report)),
        });
        assert_eq!(app.backend, BackendStatus::Healthy { platform_connected: false });
    }

    #[test]
    fn mutation_bumps_refresh_counter() {
        let mut app = app();
        app.start();
        app.navigate(Tab::Delete);
        app.delete.account_id.set("3");
        let out = app.handle_input(FormInput::Activate);
        let (origin, request) = out[0].clone();
        let account = crate::api::Account {
            id: 3,
            name: None,
            login: Some("x".into()),
            email: None,
            active: true,
            role_ids: vec![],
        };
        app.complete(Completion { origin, request, outcome: Ok(ApiReply::Account(account)) });
        app.delete.toggle_confirmation();
        let out = app.delete.delete();
        assert_eq!(out.requests, vec![ApiRequest::DeleteAccount(3)]);
        app.complete(Completion {
            origin: Origin::Screen { tab: Tab::Delete, mount: app.mount() },
            request: ApiRequest::DeleteAccount(3),
            outcome: Ok(ApiReply::Ack(Default::default())),
        });
        assert_eq!(app.refresh_counter, 1);
    }
}
