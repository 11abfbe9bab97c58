use crate::api::Account;

/// Case-insensitive substring filter over name, login and email.
///
/// An empty (or whitespace-only) query returns every account.
pub fn filter_accounts<'a>(accounts: &'a [Account], query: &str) -> Vec<&'a Account> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return accounts.iter().collect();
    }
    accounts
        .iter()
        .filter(|a| {
            a.name_or_empty().to_lowercase().contains(&q)
                || a.login_or_empty().to_lowercase().contains(&q)
                || a.email_or_empty().to_lowercase().contains(&q)
        })
        .collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn mk_account(id: u64, name: Option<&str>, login: &str, email: Option<&str>) -> Account {
		Account {
			id,
			name: name.map(|s| s.to_string()),
			login: Some(login.to_string()),
			email: email.map(|s| s.to_string()),
			active: true,
			role_ids: vec![],
		}
	}

	#[test]
	fn filters_by_name_login_or_email() {
		let accounts = vec![
			mk_account(1, Some("Alice Martin"), "amartin", Some("alice@corp.fr")),
			mk_account(2, Some("Bobby Tables"), "bob", None),
			mk_account(3, None, "svc-backup", Some("ops@corp.fr")),
		];
		let hits = filter_accounts(&accounts, "bOb");
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].id, 2);

		let hits = filter_accounts(&accounts, "CORP.fr");
		assert_eq!(hits.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);

		assert!(filter_accounts(&accounts, "nobody").is_empty());
	}

	#[test]
	fn empty_query_keeps_everything() {
		let accounts = vec![mk_account(1, None, "a", None), mk_account(2, None, "b", None)];
		assert_eq!(filter_accounts(&accounts, "  ").len(), 2);
		assert!(filter_accounts(&[], "x").is_empty());
	}
}
