//! Store lifecycle tests against the durable backends
//!
//! Each test writes through one store instance and reads back through a fresh
//! one, the way a restarted session would.

use account_store::{
    Account, AccountForm, AccountStore, AccountType, FileStorage, KeyValueStorage, SqliteStorage,
    StoreConfig, StoreError, DEFAULT_STORAGE_KEY,
};
use tempfile::tempdir;

fn ids<S: KeyValueStorage>(store: &AccountStore<S>) -> Vec<&str> {
    store.accounts().iter().map(|a| a.id.as_str()).collect()
}

/// Add, remove and re-add, then check what a later session sees
fn exercise<S: KeyValueStorage>(store: &mut AccountStore<S>) {
    assert_eq!(store.add_account().unwrap(), "1");
    assert_eq!(store.add_account().unwrap(), "2");
    store.remove_account("1").unwrap();
    assert_eq!(ids(store), vec!["2"]);
    assert_eq!(store.add_account().unwrap(), "3");
    assert_eq!(ids(store), vec!["2", "3"]);

    let mut form = AccountForm::from_account(store.get("3").unwrap().clone());
    form.set_type(AccountType::Local);
    form.account.login = "svc-backup".to_string();
    form.account.password = Some("s3cret".to_string());
    form.labels_input = "ops; nightly".to_string();
    assert!(form.validate());
    assert!(store.update_account(form.into_account()).unwrap());
}

fn check_reloaded<S: KeyValueStorage>(store: &mut AccountStore<S>) {
    store.hydrate().unwrap();

    assert_eq!(ids(store), vec!["2", "3"]);
    assert_eq!(store.next_id(), 4);

    let account = store.get("3").unwrap();
    assert_eq!(account.account_type, AccountType::Local);
    assert_eq!(account.login, "svc-backup");
    assert_eq!(account.password.as_deref(), Some("s3cret"));
    assert_eq!(account.label_texts().collect::<Vec<_>>(), vec!["ops", "nightly"]);

    assert_eq!(store.get("2"), Some(&Account::new("2")));
    assert_eq!(store.add_account().unwrap(), "4");
}

#[test]
fn test_file_storage_lifecycle() {
    let dir = tempdir().unwrap();

    let mut store = AccountStore::new(FileStorage::new(dir.path()));
    exercise(&mut store);

    let mut reloaded = AccountStore::new(FileStorage::new(dir.path()));
    check_reloaded(&mut reloaded);
}

#[test]
fn test_sqlite_storage_lifecycle() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("accounts.db");

    {
        let mut store = AccountStore::new(SqliteStorage::new(&db).unwrap());
        exercise(&mut store);
    }

    let mut reloaded = AccountStore::new(SqliteStorage::new(&db).unwrap());
    check_reloaded(&mut reloaded);
}

#[test]
fn test_persisted_layout() {
    let dir = tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    let mut store = AccountStore::new(&storage);
    store.add_account().unwrap();

    let raw = std::fs::read_to_string(dir.path().join("accounts.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "accounts": [
                { "id": "1", "labels": [], "type": "LDAP", "login": "", "password": null }
            ],
            "nextId": 2
        })
    );
}

#[test]
fn test_hydrate_reads_foreign_blob() {
    let dir = tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage
        .set(
            DEFAULT_STORAGE_KEY,
            r#"{"accounts":[{"id":"5","labels":[{"text":"a"},{"text":"a"}],"type":"Local","login":"x","password":""}],"nextId":6}"#,
        )
        .unwrap();

    let mut store = AccountStore::new(&storage);
    store.hydrate().unwrap();

    let account = store.get("5").unwrap();
    assert_eq!(account.labels.len(), 2);
    assert_eq!(account.password.as_deref(), Some(""));
    assert_eq!(store.next_id(), 6);
}

#[test]
fn test_corrupt_file_is_parse_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("accounts.json"), "not json").unwrap();

    let mut store = AccountStore::new(FileStorage::new(dir.path()));
    assert!(matches!(store.hydrate(), Err(StoreError::Parse(_))));
    assert!(store.is_empty());
}

#[test]
fn test_configured_storage() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("cfg.db");
    let db_str = db.to_string_lossy().into_owned();

    let config = StoreConfig::from_vars(|name| match name {
        "ACCOUNTS_STORAGE" => Some("sqlite".to_string()),
        "ACCOUNTS_STORAGE_PATH" => Some(db_str.clone()),
        "ACCOUNTS_STORAGE_KEY" => Some("team".to_string()),
        _ => None,
    })
    .unwrap();

    {
        let mut store = AccountStore::with_key(config.open_storage().unwrap(), config.key.clone());
        store.add_account().unwrap();
    }

    let direct = SqliteStorage::new(&db).unwrap();
    assert!(direct.get("team").unwrap().is_some());
    assert!(direct.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
}
