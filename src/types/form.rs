//! Account Form View Model
//!
//! Transient editing state for one account: the raw label text being typed
//! and per-field error flags. None of this is ever persisted; `into_account`
//! produces the entity the store keeps.

use serde::{Deserialize, Serialize};

use super::account::{Account, AccountType, Label};

/// Separator between labels in the staging text
pub const LABEL_SEPARATOR: char = ';';

/// Maximum length of the raw label text
pub const MAX_LABELS_INPUT_LEN: usize = 50;

/// Maximum length of login and password
pub const MAX_CREDENTIAL_LEN: usize = 100;

/// Per-field validation flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub labels: bool,
    pub login: bool,
    pub password: bool,
}

impl FieldErrors {
    pub fn any(&self) -> bool {
        self.labels || self.login || self.password
    }
}

/// Editing state wrapped around an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountForm {
    pub account: Account,
    pub errors: FieldErrors,
    pub labels_input: String,
}

impl AccountForm {
    /// Start editing an existing account
    pub fn from_account(account: Account) -> Self {
        let labels_input = account
            .label_texts()
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            account,
            errors: FieldErrors::default(),
            labels_input,
        }
    }

    /// Split staging text into labels, trimming parts and dropping empty ones
    pub fn parse_labels(input: &str) -> Vec<Label> {
        input
            .split(LABEL_SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Label::new)
            .collect()
    }

    /// Replace the account labels with the parsed staging text
    pub fn commit_labels(&mut self) {
        self.account.labels = Self::parse_labels(&self.labels_input);
    }

    /// Switch credential kind, keeping the password consistent with it
    pub fn set_type(&mut self, account_type: AccountType) {
        self.account.account_type = account_type;
        match account_type {
            AccountType::Ldap => self.account.password = None,
            AccountType::Local => {
                if self.account.password.is_none() {
                    self.account.password = Some(String::new());
                }
            }
        }
    }

    /// Recompute all error flags; returns true when the form is valid
    pub fn validate(&mut self) -> bool {
        let login = self.account.login.trim();

        self.errors.labels = self.labels_input.chars().count() > MAX_LABELS_INPUT_LEN;
        self.errors.login = login.is_empty() || login.chars().count() > MAX_CREDENTIAL_LEN;
        self.errors.password = match self.account.account_type {
            AccountType::Ldap => false,
            AccountType::Local => match self.account.password.as_deref() {
                None => true,
                Some(p) => p.is_empty() || p.chars().count() > MAX_CREDENTIAL_LEN,
            },
        };

        !self.errors.any()
    }

    /// Finish editing and hand back the entity to store
    pub fn into_account(mut self) -> Account {
        self.commit_labels();
        if self.account.account_type == AccountType::Ldap {
            self.account.password = None;
        }
        self.account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_account() -> Account {
        let mut account = Account::new("1");
        account.account_type = AccountType::Local;
        account.login = "alice".to_string();
        account.password = Some("hunter2".to_string());
        account
    }

    #[test]
    fn test_parse_labels() {
        let labels = AccountForm::parse_labels(" work ;; home;work ; ");
        let texts: Vec<_> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["work", "home", "work"]);
        assert!(AccountForm::parse_labels("").is_empty());
    }

    #[test]
    fn test_from_account_joins_labels() {
        let mut account = local_account();
        account.labels = vec![Label::new("a"), Label::new("b")];

        let form = AccountForm::from_account(account);
        assert_eq!(form.labels_input, "a; b");
        assert!(!form.errors.any());
    }

    #[test]
    fn test_validate_local_account() {
        let mut form = AccountForm::from_account(local_account());
        assert!(form.validate());

        form.account.password = Some(String::new());
        assert!(!form.validate());
        assert!(form.errors.password);

        form.account.password = None;
        assert!(!form.validate());
        assert!(form.errors.password);
    }

    #[test]
    fn test_validate_limits() {
        let mut form = AccountForm::from_account(local_account());
        form.labels_input = "x".repeat(MAX_LABELS_INPUT_LEN + 1);
        form.account.login = "y".repeat(MAX_CREDENTIAL_LEN + 1);

        assert!(!form.validate());
        assert!(form.errors.labels);
        assert!(form.errors.login);
        assert!(!form.errors.password);
    }

    #[test]
    fn test_ldap_password_not_required() {
        let mut form = AccountForm::from_account(Account::new("2"));
        form.account.login = "bob".to_string();
        assert!(form.validate());

        form.account.login = "   ".to_string();
        assert!(!form.validate());
        assert!(form.errors.login);
    }

    #[test]
    fn test_set_type_adjusts_password() {
        let mut form = AccountForm::from_account(Account::new("3"));
        form.set_type(AccountType::Local);
        assert_eq!(form.account.password, Some(String::new()));

        form.account.password = Some("secret".to_string());
        form.set_type(AccountType::Ldap);
        assert_eq!(form.account.password, None);
    }

    #[test]
    fn test_into_account_commits_labels() {
        let mut form = AccountForm::from_account(local_account());
        form.labels_input = "dev; ops".to_string();
        form.errors.login = true;

        let account = form.into_account();
        assert_eq!(account.label_texts().collect::<Vec<_>>(), vec!["dev", "ops"]);
        assert_eq!(account.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_form_serializes_camel_case() {
        let form = AccountForm::from_account(Account::new("4"));
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("labelsInput").is_some());
        assert_eq!(json["errors"]["login"], false);
    }
}
