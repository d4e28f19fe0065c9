//! Store integration tests against a file-backed database.

use tempfile::TempDir;
use userdb::{Database, DatabaseConfig, FieldValue, StoreConfig, StoreError, UserStore};

/// Test the full lifecycle against a database file on disk.
#[tokio::test]
async fn test_full_lifecycle_on_disk() {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("users.db"),
        ..Default::default()
    };

    let db = Database::open_with(&config).await.unwrap();
    assert!(db.is_healthy().await);
    let store = UserStore::new(db.pool().clone());

    let user = store.add_user("lifecycle@x.com", "hash-1").await.unwrap();
    store
        .update_user(user.id, &[("session_id", "sess-abc".into())])
        .await
        .unwrap();

    let found = store
        .find_user_by(&[("session_id", "sess-abc".into())])
        .await
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.email, "lifecycle@x.com");

    db.close().await;
}

/// Test that opening an existing database file recreates the schema.
#[tokio::test]
async fn test_reopen_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.db");

    let db = Database::open(&path).await.unwrap();
    let store = UserStore::new(db.pool().clone());
    store.add_user("gone@x.com", "hash").await.unwrap();
    db.close().await;

    let db = Database::open(&path).await.unwrap();
    let store = UserStore::new(db.pool().clone());
    let err = store
        .find_user_by(&[("email", "gone@x.com".into())])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    db.close().await;
}

/// Test wiring a store from a loaded configuration file.
#[tokio::test]
async fn test_store_from_config_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("configured.db");
    let config_path = dir.path().join("store.toml");
    std::fs::write(
        &config_path,
        format!(
            "[database]\npath = \"{}\"\nmax_connections = 2\n",
            db_path.display()
        ),
    )
    .unwrap();

    let config = StoreConfig::load(Some(&config_path)).unwrap();
    assert_eq!(config.database.max_connections, 2);

    let db = Database::open_with(&config.database).await.unwrap();
    let store = UserStore::new(db.pool().clone());

    let user = store.add_user("configured@x.com", "hash").await.unwrap();
    let found = store.find_user_by(&[("id", user.id.into())]).await.unwrap();
    assert_eq!(found.email, "configured@x.com");

    db.close().await;
    assert!(db_path.exists());
}

/// Test the error taxonomy through the public surface.
#[tokio::test]
async fn test_error_taxonomy() {
    let db = Database::in_memory().await.unwrap();
    let store = UserStore::new(db.pool().clone());
    let user = store.add_user("tax@x.com", "hash").await.unwrap();

    let err = store.find_user_by(&[]).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidFilter(_)));

    let err = store
        .find_user_by(&[("favorite_color", "blue".into())])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidFilter(_)));

    let err = store
        .find_user_by(&[("email", "nobody@x.com".into())])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let err = store
        .update_user(user.id, &[("favorite_color", "blue".into())])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidUpdate(_)));

    let err = store
        .update_user(user.id + 100, &[("email", "x@y.com".into())])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidUpdate(_)));

    // Reset tokens clear back to NULL like sessions do.
    store
        .update_user(user.id, &[("reset_token", "rt-1".into())])
        .await
        .unwrap();
    store
        .update_user(user.id, &[("reset_token", FieldValue::Null)])
        .await
        .unwrap();
    let found = store.find_user_by(&[("id", user.id.into())]).await.unwrap();
    assert_eq!(found.reset_token, None);
}
