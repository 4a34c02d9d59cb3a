//! Account Store CLI
//!
//! Operator entry point for inspecting and editing the persisted account list.

use account_store::common::{init_from_config, log_store_event, AppError, StorageBackend, StoreConfig};
use account_store::{Account, AccountForm, AccountStore, AccountType, KeyValueStorage};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "accounts")]
#[command(about = "Manage LDAP and Local account records")]
struct Cli {
    /// Storage backend (memory, file, sqlite); overrides ACCOUNTS_STORAGE
    #[arg(long, global = true)]
    storage: Option<String>,

    /// Directory or database path; overrides ACCOUNTS_STORAGE_PATH
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Storage key; overrides ACCOUNTS_STORAGE_KEY
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all accounts in creation order
    List,

    /// Print one account as JSON
    Show {
        /// Account id
        id: String,
    },

    /// Create an account, optionally filling it in
    Add(AccountFields),

    /// Replace fields of an existing account
    Update {
        /// Account id
        id: String,

        #[command(flatten)]
        fields: AccountFields,
    },

    /// Delete an account
    Remove {
        /// Account id
        id: String,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct AccountFields {
    /// Account type (LDAP or Local)
    #[arg(short = 't', long = "type")]
    account_type: Option<AccountType>,

    /// Login name
    #[arg(short, long)]
    login: Option<String>,

    /// Password (Local accounts only)
    #[arg(short, long)]
    password: Option<String>,

    /// Labels separated by ';'
    #[arg(long)]
    labels: Option<String>,
}

impl AccountFields {
    fn is_empty(&self) -> bool {
        self.account_type.is_none()
            && self.login.is_none()
            && self.password.is_none()
            && self.labels.is_none()
    }

    /// Apply the given fields on top of `account`, validating the result
    fn apply(self, account: Account) -> Result<Account, AppError> {
        let mut form = AccountForm::from_account(account);

        if let Some(account_type) = self.account_type {
            form.set_type(account_type);
        }
        if let Some(login) = self.login {
            form.account.login = login;
        }
        if let Some(password) = self.password {
            form.account.password = Some(password);
        }
        if let Some(labels) = self.labels {
            form.labels_input = labels;
        }

        if !form.validate() {
            let mut fields = Vec::new();
            if form.errors.labels {
                fields.push("labels");
            }
            if form.errors.login {
                fields.push("login");
            }
            if form.errors.password {
                fields.push("password");
            }
            return Err(AppError::validation(format!("invalid {}", fields.join(", "))));
        }

        Ok(form.into_account())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error [{}]: {}", e.error_code(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_from_config(&config) {
        eprintln!("warning: {}", e);
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<StoreConfig, AppError> {
    let mut config = StoreConfig::from_env()?;

    if let Some(storage) = &cli.storage {
        let backend: StorageBackend = storage.parse()?;
        if backend != config.backend && cli.path.is_none() {
            config.path = backend.default_path();
        }
        config.backend = backend;
    }
    if let Some(path) = &cli.path {
        config.path = Some(path.clone());
    }
    if let Some(key) = &cli.key {
        config.key = key.clone();
    }

    Ok(config)
}

fn run(command: Commands, config: &StoreConfig) -> Result<(), AppError> {
    if let Commands::Config = command {
        config.print_summary();
        return Ok(());
    }

    let storage = config.open_storage()?;
    let mut store = AccountStore::with_key(storage, config.key.clone());
    store.hydrate()?;

    match command {
        Commands::List => print_list(&store),
        Commands::Show { id } => {
            let account = store.get(&id).ok_or_else(|| AppError::not_found(&id))?;
            print_json(account);
        }
        Commands::Add(fields) => {
            let id = add_account_with_fields(&mut store, fields)?;
            log_store_event("add_account", Some(&id), store.len(), None);
            println!("{}", id);
        }
        Commands::Update { id, fields } => {
            let account = store.get(&id).cloned().ok_or_else(|| AppError::not_found(&id))?;
            store.update_account(fields.apply(account)?)?;
            log_store_event("update_account", Some(&id), store.len(), None);
            print_json(store.get(&id).ok_or_else(|| AppError::not_found(&id))?);
        }
        Commands::Remove { id } => {
            if !store.remove_account(&id)? {
                return Err(AppError::not_found(id));
            }
            log_store_event("remove_account", Some(&id), store.len(), None);
        }
        Commands::Config => {}
    }

    Ok(())
}

/// Add an account filled in from `fields`
///
/// Fields are validated against the id about to be issued, so a rejected
/// form leaves both the store and storage untouched.
fn add_account_with_fields<S: KeyValueStorage>(
    store: &mut AccountStore<S>,
    fields: AccountFields,
) -> Result<String, AppError> {
    if fields.is_empty() {
        return Ok(store.add_account()?);
    }

    let account = fields.apply(Account::new(store.next_id().to_string()))?;
    let id = store.add_account()?;
    store.update_account(account)?;
    Ok(id)
}

fn print_list<S: KeyValueStorage>(store: &AccountStore<S>) {
    if store.is_empty() {
        println!("No accounts (next id {})", store.next_id());
        return;
    }

    println!("{:<6} {:<6} {:<24} {:<10} LABELS", "ID", "TYPE", "LOGIN", "PASSWORD");
    for account in store.accounts() {
        let password = match &account.password {
            None => "-",
            Some(p) if p.is_empty() => "(empty)",
            Some(_) => "****",
        };
        println!(
            "{:<6} {:<6} {:<24} {:<10} {}",
            account.id,
            account.account_type,
            account.login,
            password,
            account.label_texts().collect::<Vec<_>>().join("; ")
        );
    }
}

fn print_json(account: &Account) {
    match serde_json::to_string_pretty(account) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to render account {}: {}", account.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_store::{MemoryStorage, DEFAULT_STORAGE_KEY};

    fn fields(account_type: Option<AccountType>, login: &str, password: Option<&str>) -> AccountFields {
        AccountFields {
            account_type,
            login: Some(login.to_string()),
            password: password.map(str::to_string),
            labels: None,
        }
    }

    #[test]
    fn test_add_rejected_fields_leave_no_trace() {
        let storage = MemoryStorage::new();
        let mut store = AccountStore::new(storage.clone());

        let result = add_account_with_fields(&mut store, fields(Some(AccountType::Local), "svc", None));

        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("password"));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(storage.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_add_with_fields_persists_filled_account() {
        let storage = MemoryStorage::new();
        let mut store = AccountStore::new(storage.clone());

        let id = add_account_with_fields(&mut store, fields(Some(AccountType::Local), "svc", Some("pw")))
            .unwrap();
        assert_eq!(id, "1");

        let mut reloaded = AccountStore::new(storage);
        reloaded.hydrate().unwrap();
        let account = reloaded.get("1").unwrap();
        assert_eq!(account.account_type, AccountType::Local);
        assert_eq!(account.login, "svc");
        assert_eq!(account.password.as_deref(), Some("pw"));
        assert_eq!(reloaded.next_id(), 2);
    }

    #[test]
    fn test_add_without_fields_is_blank() {
        let mut store = AccountStore::new(MemoryStorage::new());
        let empty = AccountFields {
            account_type: None,
            login: None,
            password: None,
            labels: None,
        };

        let id = add_account_with_fields(&mut store, empty).unwrap();
        assert_eq!(store.get(&id), Some(&Account::new("1")));
    }
}
