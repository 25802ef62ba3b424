use healthsync_core::models::auth::{Session, User};
use healthsync_session::store::{FileSessionStore, MemorySessionStore, SessionStore};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn session() -> Session {
    Session {
        user: User {
            id: "u1".to_string(),
            username: "ana".to_string(),
            email: Some("ana@example.com".to_string()),
            role: Some("user".to_string()),
        },
        token: "tok".to_string(),
    }
}

#[tokio::test]
async fn test_memory_store_get_set_clear() {
    let store = MemorySessionStore::new();
    assert_eq!(store.get().await.unwrap(), None);

    store.set(&session()).await.unwrap();
    assert_eq!(store.get().await.unwrap(), Some(session()));

    store.clear().await.unwrap();
    assert_eq!(store.get().await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_persists_across_instances() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    FileSessionStore::new(&path).set(&session()).await.unwrap();
    assert!(path.exists());

    let reopened = FileSessionStore::new(&path);
    assert_eq!(reopened.get().await.unwrap(), Some(session()));
}

#[tokio::test]
async fn test_file_store_missing_file_is_no_session() {
    let dir = tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("absent.json"));

    assert_eq!(store.get().await.unwrap(), None);
    // Clearing an absent file is not an error.
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_file_store_clear_removes_file() {
    let dir = tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));

    store.set(&session()).await.unwrap();
    store.clear().await.unwrap();

    assert!(!store.path().exists());
    assert_eq!(store.get().await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_corrupt_file_is_storage_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = FileSessionStore::new(&path).get().await.unwrap_err();
    assert!(err.to_string().contains("Storage error"), "unexpected error: {}", err);
}
