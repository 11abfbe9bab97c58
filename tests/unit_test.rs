// Unit tests for directory-console
// These tests work with the public API only.

#[cfg(test)]
mod model_tests {
    use directory_console::api::{Account, HealthReport, UpdateAccountRequest};
    use serde_json::json;

    #[test]
    fn test_account_accepts_false_for_empty_text() {
        let account: Account = serde_json::from_value(json!({
            "id": 12, "name": "Ada", "login": "ada", "email": false,
            "active": true, "groups_id": [3, 1]
        }))
        .unwrap();
        assert_eq!(account.email, None);
        assert_eq!(account.email_or_empty(), "");
        assert_eq!(account.role_ids, vec![3, 1]);
    }

    #[test]
    fn test_empty_update_serializes_to_empty_object() {
        let body = UpdateAccountRequest::default();
        assert!(body.is_empty());
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({}));
    }

    #[test]
    fn test_health_report_maps_platform_flag() {
        let h: HealthReport = serde_json::from_value(json!({"status": "healthy", "odoo_connection": false})).unwrap();
        assert!(h.is_healthy());
        assert!(!h.platform_connected);
    }
}

#[cfg(test)]
mod screen_tests {
    use directory_console::api::{Account, Role, StatusMessage};
    use directory_console::app::dispatch::{ApiReply, ApiRequest};
    use directory_console::screens::create::CreateField;
    use directory_console::screens::edit::EditField;
    use directory_console::screens::{
        CreateAccountForm, DeleteAccountForm, RolesManager, Screen, UpdateAccountForm,
    };

    fn account(id: u64, roles: &[u64]) -> Account {
        Account {
            id,
            name: Some("Test User".into()),
            login: Some("test".into()),
            email: Some("test@x.com".into()),
            active: true,
            role_ids: roles.to_vec(),
        }
    }

    #[test]
    fn test_blank_login_never_reaches_the_network() {
        for login in ["", " ", "\t  "] {
            let mut form = CreateAccountForm::new(12);
            form.field_mut(CreateField::Login).set(login);
            form.field_mut(CreateField::Email).set("a@b.com");
            let fx = form.submit();
            assert!(fx.requests.is_empty(), "login {login:?}");
            assert!(form.banner.as_ref().unwrap().is_error());
            assert!(!form.busy);
        }
    }

    #[test]
    fn test_update_payload_tracks_non_blank_fields() {
        let values = ["", "  ", "x"];
        for name in values {
            for email in values {
                let mut form = UpdateAccountForm::new(12);
                form.account_id.set("1");
                let fx = form.search();
                form.complete(&fx.requests[0], Ok(ApiReply::Account(account(1, &[]))));
                form.field_mut(EditField::Name).set(name);
                form.field_mut(EditField::Login).set("");
                form.field_mut(EditField::Email).set(email);
                let changes = form.build_changes();
                assert_eq!(changes.name.is_some(), !name.trim().is_empty());
                assert_eq!(changes.email.is_some(), !email.trim().is_empty());
                assert!(changes.login.is_none());
            }
        }
    }

    #[test]
    fn test_roles_scenario_account_42() {
        let mut m = RolesManager::new();
        let fx = m.setup();
        let catalog = vec![Role::new(1, "A"), Role::new(2, "B"), Role::new(3, "C")];
        m.complete(&fx.requests[0], Ok(ApiReply::Catalog(catalog)));
        m.account_id.set("42");
        let fx = m.search();
        let held = vec![Role::new(1, "A"), Role::new(2, "B")];
        m.complete(
            &fx.requests[0],
            Ok(ApiReply::AccountWithRoles { account: account(42, &[1, 2]), roles: held }),
        );
        let add: Vec<u64> = m.add_candidates().iter().map(|r| r.id).collect();
        let remove: Vec<u64> = m.remove_candidates().iter().map(|r| r.id).collect();
        assert_eq!(add, vec![3]);
        assert_eq!(remove, vec![1, 2]);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut form = DeleteAccountForm::new();
        form.account_id.set("8");
        let fx = form.search();
        form.complete(&fx.requests[0], Ok(ApiReply::Account(account(8, &[]))));
        assert!(form.delete().requests.is_empty());
        form.toggle_confirmation();
        assert_eq!(form.delete().requests, vec![ApiRequest::DeleteAccount(8)]);
        let fx = form.complete(
            &ApiRequest::DeleteAccount(8),
            Ok(ApiReply::Ack(StatusMessage { message: None })),
        );
        assert!(fx.changed);
        assert_eq!(form.banner.as_ref().map(|b| b.text.as_str()), Some("Account deleted"));
    }
}

#[cfg(test)]
mod search_tests {
    use directory_console::api::Account;
    use directory_console::search::filter_accounts;

    #[test]
    fn test_filter_matches_email_case_insensitively() {
        let accounts = vec![Account {
            id: 1,
            name: None,
            login: Some("jdoe".into()),
            email: Some("John.Doe@Corp.fr".into()),
            active: true,
            role_ids: vec![],
        }];
        assert_eq!(filter_accounts(&accounts, "john.doe").len(), 1);
        assert!(filter_accounts(&accounts, "jane").is_empty());
    }
}
