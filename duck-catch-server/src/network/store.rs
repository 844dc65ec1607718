//! Achievement Store
//!
//! Persistence behind the gateway. The list order is owned by the store:
//! level descending, then date ascending, then insertion order.

use std::cmp::Reverse;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::network::protocol::Achievement;

/// Value of `DATABASE_URL` selecting the in-process store.
pub const MEMORY_STORE_URL: &str = "memory";

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No backing database is connected.
    #[error("Database not connected")]
    Unavailable,

    /// Query or connection failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Append-only achievement persistence.
#[async_trait]
pub trait AchievementStore: Send + Sync {
    /// All records, best first.
    async fn list(&self) -> Result<Vec<Achievement>, StoreError>;

    /// Append one record.
    async fn insert(&self, record: Achievement) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Shared store handle.
pub type SharedStore = Arc<dyn AchievementStore>;

/// Open the store selected by `database_url`.
///
/// `memory` selects [`MemoryAchievementStore`]; anything else is handed to
/// SQLite.
pub async fn connect(database_url: &str) -> Result<SharedStore, StoreError> {
    if database_url == MEMORY_STORE_URL {
        return Ok(Arc::new(MemoryAchievementStore::new()));
    }
    let store = SqliteAchievementStore::connect(database_url).await?;
    Ok(Arc::new(store))
}

// =============================================================================
// SQLITE
// =============================================================================

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS achievements (
    seq   INTEGER PRIMARY KEY AUTOINCREMENT,
    id    TEXT NOT NULL UNIQUE,
    name  TEXT NOT NULL,
    level INTEGER NOT NULL,
    date  TEXT NOT NULL
)";

#[derive(Debug, sqlx::FromRow)]
struct AchievementRow {
    id: String,
    name: String,
    level: i64,
    date: String,
}

impl From<AchievementRow> for Achievement {
    fn from(row: AchievementRow) -> Self {
        Self {
            id: Uuid::parse_str(&row.id).ok(),
            name: row.name,
            level: u32::try_from(row.level).unwrap_or(0),
            date: row.date,
        }
    }
}

/// SQLite-backed store.
#[derive(Clone, Debug)]
pub struct SqliteAchievementStore {
    pool: SqlitePool,
}

impl SqliteAchievementStore {
    /// Connect and create the table if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own database
        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self::with_pool(pool).await?;
        info!("Achievement store connected: {}", database_url);
        Ok(store)
    }

    /// Wrap an existing pool and create the table if needed.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl AchievementStore for SqliteAchievementStore {
    async fn list(&self) -> Result<Vec<Achievement>, StoreError> {
        let rows = sqlx::query_as::<_, AchievementRow>(
            "SELECT id, name, level, date FROM achievements ORDER BY level DESC, date ASC, seq ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Achievement::from).collect())
    }

    async fn insert(&self, record: Achievement) -> Result<(), StoreError> {
        let id = record.id.unwrap_or_else(Uuid::new_v4);
        sqlx::query("INSERT INTO achievements (id, name, level, date) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(&record.name)
            .bind(i64::from(record.level))
            .bind(&record.date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-process store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryAchievementStore {
    records: RwLock<Vec<Achievement>>,
}

impl MemoryAchievementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AchievementStore for MemoryAchievementStore {
    async fn list(&self) -> Result<Vec<Achievement>, StoreError> {
        let mut records = self.records.read().await.clone();
        // Stable sort keeps insertion order for equal keys
        records.sort_by(|a, b| {
            (Reverse(a.level), &a.date).cmp(&(Reverse(b.level), &b.date))
        });
        Ok(records)
    }

    async fn insert(&self, mut record: Achievement) -> Result<(), StoreError> {
        record.id.get_or_insert_with(Uuid::new_v4);
        self.records.write().await.push(record);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// UNAVAILABLE
// =============================================================================

/// Stand-in used when the database could not be reached at startup.
///
/// Every operation fails with [`StoreError::Unavailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStore;

#[async_trait]
impl AchievementStore for UnavailableStore {
    async fn list(&self) -> Result<Vec<Achievement>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn insert(&self, _record: Achievement) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn backend(&self) -> &'static str {
        "unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, level: u32, secs: i64) -> Achievement {
        let at = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        Achievement::new(name, level, at)
    }

    async fn check_ordering(store: &dyn AchievementStore) {
        assert!(store.list().await.unwrap().is_empty());

        store.insert(record("late-2", 2, 50)).await.unwrap();
        store.insert(record("early-2", 2, 10)).await.unwrap();
        store.insert(record("top", 5, 99)).await.unwrap();
        store.insert(record("one", 1, 0)).await.unwrap();
        // Same level and date as "early-2": insertion order breaks the tie
        store.insert(record("tie-2", 2, 10)).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["top", "early-2", "tie-2", "late-2", "one"]);
    }

    #[tokio::test]
    async fn test_memory_store_ordering() {
        let store = MemoryAchievementStore::new();
        check_ordering(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_ordering() {
        let store = SqliteAchievementStore::connect("sqlite::memory:").await.unwrap();
        check_ordering(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_round_trips_fields() {
        let store = SqliteAchievementStore::connect("sqlite::memory:").await.unwrap();
        let saved = record("Ana", 3, 7);
        store.insert(saved.clone()).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![saved]);
    }

    #[tokio::test]
    async fn test_connect_selects_backend() {
        let memory = connect(MEMORY_STORE_URL).await.unwrap();
        assert_eq!(memory.backend(), "memory");

        let sqlite = connect("sqlite::memory:").await.unwrap();
        assert_eq!(sqlite.backend(), "sqlite");
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = UnavailableStore;
        assert!(matches!(store.list().await, Err(StoreError::Unavailable)));
        assert!(matches!(
            store.insert(record("x", 1, 0)).await,
            Err(StoreError::Unavailable)
        ));
    }
}
