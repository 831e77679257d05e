//! SQLite-backed story storage.

use async_trait::async_trait;
use fabula_domain::Story;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, StoreError, StoryStorePort};

/// Fixed namespace key the whole collection is stored under.
pub const STORY_NAMESPACE: &str = "fabula_stories";

/// SQLite implementation of the whole-collection story store.
///
/// The entire story list lives in one JSON blob under a fixed namespace
/// key; every save replaces it (last write wins).
pub struct SqliteStoryStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteStoryStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| StoreError::database("stories", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stories (
                namespace TEXT NOT NULL PRIMARY KEY,
                stories_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::database("stories", e))?;

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl StoryStorePort for SqliteStoryStore {
    async fn load(&self) -> Result<Vec<Story>, StoreError> {
        let row = sqlx::query("SELECT stories_json FROM stories WHERE namespace = ?")
            .bind(STORY_NAMESPACE)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database("stories", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("stories_json");
                let stories = serde_json::from_str(&json)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(stories)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, stories: &[Story]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(stories).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO stories (namespace, stories_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(namespace) DO UPDATE SET
                stories_json = excluded.stories_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(STORY_NAMESPACE)
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database("stories", e))?;

        Ok(())
    }
}
