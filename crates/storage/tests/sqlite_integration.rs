use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_replaces_and_removes_slots() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("triviaHighScores").await.unwrap(), None);

    repo.put("triviaHighScores", "[1]").await.unwrap();
    repo.put("triviaHighScores", "[1,2]").await.unwrap();
    assert_eq!(
        repo.get("triviaHighScores").await.unwrap().as_deref(),
        Some("[1,2]")
    );

    repo.remove("triviaHighScores").await.unwrap();
    repo.remove("triviaHighScores").await.unwrap();
    assert_eq!(repo.get("triviaHighScores").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_slots_are_independent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_slots?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.put("a", "alpha").await.unwrap();
    repo.put("b", "beta").await.unwrap();
    repo.remove("a").await.unwrap();

    assert_eq!(repo.get("a").await.unwrap(), None);
    assert_eq!(repo.get("b").await.unwrap().as_deref(), Some("beta"));
}

#[tokio::test]
async fn migrations_can_run_twice() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.put("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_exposes_slots() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.slots.put("k", "v").await.unwrap();
    assert_eq!(storage.slots.get("k").await.unwrap().as_deref(), Some("v"));
}
