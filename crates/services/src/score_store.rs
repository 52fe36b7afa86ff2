use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use storage::KeyValueStore;
use trivia_core::model::{GameResult, GameSettings, PlayerName};

use crate::error::ScoreStoreError;
use crate::sessions::{EventBus, GameEvent, leaderboard_entries};

/// Slot holding the serialized leaderboard.
pub const LEADERBOARD_KEY: &str = "triviaHighScores";

/// Stored shape of one leaderboard entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LeaderboardRecord {
    name: String,
    score: u32,
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl From<&GameResult> for LeaderboardRecord {
    fn from(result: &GameResult) -> Self {
        Self {
            name: result.player_name().as_str().to_owned(),
            score: result.score(),
            correct: result.correct_count(),
            total: result.total_questions(),
            date: result.completed_at(),
        }
    }
}

impl LeaderboardRecord {
    fn into_result(self) -> Option<GameResult> {
        let name = PlayerName::parse(&self.name).ok()?;
        GameResult::new(name, self.score, self.correct, self.total, self.date).ok()
    }
}

/// Ranked, size-bounded list of finished games kept in one key-value slot.
///
/// The list is always sorted by score, highest first, with ties kept in the
/// order they were recorded. Missing or unreadable data reads as an empty
/// leaderboard.
pub struct ScoreStore {
    slots: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    write_lock: Mutex<()>,
    events: EventBus,
}

impl ScoreStore {
    pub const DEFAULT_CAPACITY: usize = 10;

    #[must_use]
    pub fn new(slots: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slots,
            key: LEADERBOARD_KEY.to_owned(),
            capacity: Self::DEFAULT_CAPACITY,
            write_lock: Mutex::new(()),
            events: EventBus::new(),
        }
    }

    #[must_use]
    pub fn from_settings(slots: Arc<dyn KeyValueStore>, settings: &GameSettings) -> Self {
        let capacity = usize::try_from(settings.leaderboard_capacity()).unwrap_or(usize::MAX);
        Self {
            capacity,
            ..Self::new(slots)
        }
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Insert `result`, keep the best `capacity` entries, and write the list back.
    ///
    /// Returns the 1-based rank of the new entry, or `None` if it did not make
    /// the cut.
    ///
    /// # Errors
    ///
    /// Returns `ScoreStoreError` if the list cannot be encoded or written. The
    /// stored list is unchanged in that case.
    pub async fn record(&self, result: &GameResult) -> Result<Option<usize>, ScoreStoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await;
        let position = entries
            .iter()
            .take_while(|e| e.score() >= result.score())
            .count();
        entries.insert(position, result.clone());
        entries.truncate(self.capacity);

        self.save(&entries).await?;

        let rank = (position < self.capacity).then_some(position + 1);
        debug!(
            player = result.player_name().as_str(),
            score = result.score(),
            ?rank,
            "recorded game result"
        );
        self.publish(&entries);
        Ok(rank)
    }

    /// Up to `limit` entries, highest score first.
    pub async fn top_scores(&self, limit: usize) -> Vec<GameResult> {
        let mut entries = self.load().await;
        entries.truncate(limit);
        entries
    }

    /// Best score on record, or 0 when the leaderboard is empty.
    pub async fn high_score(&self) -> u32 {
        self.top_scores(1).await.first().map_or(0, GameResult::score)
    }

    /// Remove every entry. Clearing an empty leaderboard succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ScoreStoreError::Storage` if the slot cannot be deleted.
    pub async fn clear(&self) -> Result<(), ScoreStoreError> {
        let _guard = self.write_lock.lock().await;
        self.slots.remove(&self.key).await?;
        debug!(key = %self.key, "cleared leaderboard");
        self.publish(&[]);
        Ok(())
    }

    async fn load(&self) -> Vec<GameResult> {
        let blob = match self.slots.get(&self.key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "leaderboard unreadable, treating as empty");
                return Vec::new();
            }
        };

        let raw: Vec<serde_json::Value> = match serde_json::from_str(&blob) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %self.key, error = %err, "leaderboard corrupt, treating as empty");
                return Vec::new();
            }
        };

        let total = raw.len();
        let mut entries: Vec<GameResult> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value::<LeaderboardRecord>(value).ok())
            .filter_map(LeaderboardRecord::into_result)
            .collect();
        if entries.len() < total {
            warn!(
                key = %self.key,
                dropped = total - entries.len(),
                "dropped invalid leaderboard entries"
            );
        }

        entries.sort_by_key(|e| std::cmp::Reverse(e.score()));
        entries.truncate(self.capacity);
        entries
    }

    async fn save(&self, entries: &[GameResult]) -> Result<(), ScoreStoreError> {
        let records: Vec<LeaderboardRecord> = entries.iter().map(LeaderboardRecord::from).collect();
        let blob = serde_json::to_string(&records)?;
        self.slots.put(&self.key, &blob).await?;
        Ok(())
    }

    fn publish(&self, entries: &[GameResult]) {
        self.events.publish(GameEvent::LeaderboardChanged {
            entries: leaderboard_entries(entries),
            high_score: entries.first().map_or(0, GameResult::score),
        });
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storage::InMemoryRepository;
    use trivia_core::time::fixed_now;

    fn result(name: &str, score: u32) -> GameResult {
        let correct = score / 100;
        GameResult::new(
            PlayerName::parse(name).unwrap(),
            score,
            correct,
            correct.max(10),
            fixed_now(),
        )
        .unwrap()
    }

    fn store() -> (ScoreStore, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        (ScoreStore::new(repo.clone()), repo)
    }

    fn scores(entries: &[GameResult]) -> Vec<u32> {
        entries.iter().map(GameResult::score).collect()
    }

    #[tokio::test]
    async fn empty_store_reads_empty() {
        let (store, _) = store();
        assert!(store.top_scores(10).await.is_empty());
        assert_eq!(store.high_score().await, 0);
    }

    #[tokio::test]
    async fn keeps_the_ten_highest_of_eleven() {
        let (store, _) = store();
        for score in (0..=10).rev().map(|i| i * 100) {
            store.record(&result("Ada", score)).await.unwrap();
        }

        let top = store.top_scores(20).await;
        assert_eq!(
            scores(&top),
            vec![1000, 900, 800, 700, 600, 500, 400, 300, 200, 100]
        );
        assert_eq!(store.high_score().await, 1000);
    }

    #[tokio::test]
    async fn results_are_sorted_after_every_record() {
        let (store, _) = store();
        for score in [300, 700, 100, 900, 500] {
            store.record(&result("Ada", score)).await.unwrap();
            let top = scores(&store.top_scores(10).await);
            assert!(top.windows(2).all(|w| w[0] >= w[1]));
        }
        assert_eq!(scores(&store.top_scores(3).await), vec![900, 700, 500]);
    }

    #[tokio::test]
    async fn ties_keep_recording_order() {
        let (store, _) = store();
        assert_eq!(store.record(&result("First", 500)).await.unwrap(), Some(1));
        assert_eq!(store.record(&result("Second", 500)).await.unwrap(), Some(2));
        assert_eq!(store.record(&result("Top", 800)).await.unwrap(), Some(1));

        let names: Vec<String> = store
            .top_scores(10)
            .await
            .iter()
            .map(|r| r.player_name().as_str().to_owned())
            .collect();
        assert_eq!(names, vec!["Top", "First", "Second"]);
    }

    #[tokio::test]
    async fn result_below_the_cut_has_no_rank() {
        let (store, _) = store();
        for _ in 0..10 {
            store.record(&result("Ada", 500)).await.unwrap();
        }
        assert_eq!(store.record(&result("Bea", 500)).await.unwrap(), None);
        assert_eq!(store.record(&result("Cy", 100)).await.unwrap(), None);
        assert_eq!(store.top_scores(20).await.len(), 10);
    }

    #[tokio::test]
    async fn corrupt_blob_reads_as_empty() {
        let (store, repo) = store();
        repo.put(LEADERBOARD_KEY, "{not json").await.unwrap();
        assert!(store.top_scores(10).await.is_empty());

        assert_eq!(store.record(&result("Ada", 300)).await.unwrap(), Some(1));
        assert_eq!(scores(&store.top_scores(10).await), vec![300]);
    }

    #[tokio::test]
    async fn invalid_entries_are_dropped_and_rest_are_sorted() {
        let (store, repo) = store();
        let date = fixed_now().to_rfc3339();
        let blob = format!(
            r#"[
                {{"name":"Low","score":100,"correct":1,"total":10,"date":"{date}"}},
                {{"name":"   ","score":900,"correct":9,"total":10,"date":"{date}"}},
                {{"name":"Bad","score":500,"correct":11,"total":10,"date":"{date}"}},
                {{"name":"High","score":700,"correct":7,"total":10,"date":"{date}"}},
                "garbage"
            ]"#
        );
        repo.put(LEADERBOARD_KEY, &blob).await.unwrap();

        let top = store.top_scores(10).await;
        assert_eq!(scores(&top), vec![700, 100]);
        assert_eq!(top[0].player_name().as_str(), "High");
    }

    #[tokio::test]
    async fn stored_blob_uses_the_leaderboard_shape() {
        let (store, repo) = store();
        let finished = GameResult::new(
            PlayerName::parse("Ada").unwrap(),
            700,
            7,
            10,
            fixed_now() + Duration::minutes(5),
        )
        .unwrap();
        store.record(&finished).await.unwrap();

        let blob = repo.get(LEADERBOARD_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let entry = &value[0];
        assert_eq!(entry["name"], "Ada");
        assert_eq!(entry["score"], 700);
        assert_eq!(entry["correct"], 7);
        assert_eq!(entry["total"], 10);
        assert!(entry["date"].is_string());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (store, _) = store();
        store.record(&result("Ada", 300)).await.unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        for k in [0, 1, 10] {
            assert!(store.top_scores(k).await.is_empty());
        }
    }

    #[tokio::test]
    async fn capacity_comes_from_settings() {
        let repo = Arc::new(InMemoryRepository::new());
        let settings = GameSettings::new(10, 100, 3).unwrap();
        let store = ScoreStore::from_settings(repo, &settings);
        for score in [100, 200, 300, 400] {
            store.record(&result("Ada", score)).await.unwrap();
        }
        assert_eq!(scores(&store.top_scores(10).await), vec![400, 300, 200]);
    }

    #[tokio::test]
    async fn writes_publish_leaderboard_changes() {
        let (store, _) = store();
        let mut rx = store.events().subscribe();

        store.record(&result("Ada", 400)).await.unwrap();
        match rx.recv().await.unwrap() {
            GameEvent::LeaderboardChanged {
                entries,
                high_score,
            } => {
                assert_eq!(high_score, 400);
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].rank, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }

        store.clear().await.unwrap();
        assert!(matches!(
            rx.recv().await.unwrap(),
            GameEvent::LeaderboardChanged {
                high_score: 0,
                ..
            }
        ));
    }

    /// Slot store that yields after every read and before every write.
    struct YieldingStore {
        inner: InMemoryRepository,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for YieldingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, storage::StorageError> {
            let value = self.inner.get(key).await;
            tokio::task::yield_now().await;
            value
        }

        async fn put(&self, key: &str, value: &str) -> Result<(), storage::StorageError> {
            tokio::task::yield_now().await;
            self.inner.put(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), storage::StorageError> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_records_are_all_kept() {
        let slots = Arc::new(YieldingStore {
            inner: InMemoryRepository::new(),
        });
        let store = Arc::new(ScoreStore::new(slots));

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .record(&result(&format!("Player {i}"), i * 100))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(
            scores(&store.top_scores(10).await),
            vec![800, 700, 600, 500, 400, 300, 200, 100]
        );
    }
}
