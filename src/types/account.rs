//! Account Record Types
//!
//! The persisted entity managed by the account store. Field names and enum
//! spellings match the stored JSON layout exactly.

use serde::{Deserialize, Serialize};

/// Kind of credential an account holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Directory-backed credential; no password is kept locally
    #[default]
    #[serde(rename = "LDAP")]
    Ldap,
    /// Locally managed login and password
    Local,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ldap => "LDAP",
            Self::Local => "Local",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ldap" => Ok(Self::Ldap),
            "local" => Ok(Self::Local),
            _ => Err(format!("unknown account type: {}", s)),
        }
    }
}

/// A free-text tag attached to an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A stored credential record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier (decimal string of the id counter)
    pub id: String,
    /// Labels in display order; duplicates allowed
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Credential kind
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    /// Login name
    #[serde(default)]
    pub login: String,
    /// Password; `None` is stored as `null` and differs from an empty string
    #[serde(default)]
    pub password: Option<String>,
}

impl Account {
    /// Blank record as created by the store
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            account_type: AccountType::Ldap,
            login: String::new(),
            password: None,
        }
    }

    /// Numeric value of the id, if it was issued by the counter
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }

    /// Label texts in display order
    pub fn label_texts(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.text.as_str())
    }
}
