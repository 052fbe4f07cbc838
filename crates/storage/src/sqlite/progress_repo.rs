use async_trait::async_trait;
use chrono::Utc;
use course_core::model::Progress;
use sqlx::Row;

use crate::repository::{ProgressRepository, StorageError};
use crate::snapshot;

use super::SqliteRepository;

/// Storage key of the singleton snapshot row.
const SNAPSHOT_KEY: &str = "progress";

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load(&self) -> Result<Option<Progress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT body
            FROM progress_snapshots
            WHERE key = ?1
            ",
        )
        .bind(SNAPSHOT_KEY)
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let body: String = row
            .try_get("body")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        snapshot::decode(&body)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        let body = snapshot::encode(progress)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO progress_snapshots (key, schema_version, body, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                schema_version = excluded.schema_version,
                body = excluded.body,
                updated_at = excluded.updated_at
            ",
        )
        .bind(SNAPSHOT_KEY)
        .bind(i64::from(snapshot::SCHEMA_VERSION))
        .bind(body)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_snapshots WHERE key = ?1")
            .bind(SNAPSHOT_KEY)
            .execute(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
