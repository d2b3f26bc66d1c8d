//! SQLite VideoRepository implementation.

use super::pool::SqliteVideoStore;
use super::VIDEO_COLUMNS;
use crate::domain::video::{NewVideoRecord, RecordChanges, VideoRecord, VideoState};
use crate::ports::repository::{StoreError, VideoRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn record_from_row(row: &SqliteRow) -> Result<VideoRecord, StoreError> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<VideoState>()
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let processing_status: i64 = row.try_get("processing_status")?;
    let processing_status = u8::try_from(processing_status).map_err(|_| {
        StoreError::Corrupt(format!("processing_status out of range: {}", processing_status))
    })?;

    let metadata = row
        .try_get::<Option<String>, _>("metadata")?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|e| StoreError::Corrupt(format!("metadata: {}", e)))?;

    Ok(VideoRecord {
        id: row.try_get("id")?,
        remote_video_id: row.try_get("video_id")?,
        remote_library_id: row.try_get("library_id")?,
        title: row.try_get("title")?,
        status,
        processing_status,
        playable_link: row.try_get("playable_link")?,
        metadata,
        created_at: timestamp(row.try_get("created_at")?)?,
        updated_at: timestamp(row.try_get("updated_at")?)?,
    })
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Corrupt(format!("invalid timestamp {}", secs)))
}

fn metadata_json(value: &Option<serde_json::Value>) -> Option<String> {
    value.as_ref().map(|v| v.to_string())
}

#[async_trait]
impl VideoRepository for SqliteVideoStore {
    async fn insert(&self, record: NewVideoRecord) -> Result<VideoRecord, StoreError> {
        let now = Utc::now().timestamp();
        let sql = format!(
            "INSERT INTO videos (video_id, library_id, title, status, processing_status, \
             playable_link, metadata, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            VIDEO_COLUMNS
        );

        let result = sqlx::query(&sql)
            .bind(&record.remote_video_id)
            .bind(&record.remote_library_id)
            .bind(record.title_or_default())
            .bind(record.status.as_str())
            .bind(i64::from(record.processing_status))
            .bind(&record.playable_link)
            .bind(metadata_json(&record.metadata))
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => record_from_row(&row),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate(record.remote_video_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_remote_id(&self, remote_id: &str) -> Result<Option<VideoRecord>, StoreError> {
        let sql = format!("SELECT {} FROM videos WHERE video_id = ?", VIDEO_COLUMNS);
        sqlx::query(&sql)
            .bind(remote_id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(record_from_row)
            .transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<VideoRecord>, StoreError> {
        let sql = format!("SELECT {} FROM videos WHERE id = ?", VIDEO_COLUMNS);
        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(record_from_row)
            .transpose()
    }

    async fn update(
        &self,
        remote_id: &str,
        changes: RecordChanges,
    ) -> Result<VideoRecord, StoreError> {
        // Each column is only overwritten when a new value is supplied, so
        // concurrent updates touching different fields never clobber each other.
        let sql = format!(
            "UPDATE videos SET \
             title = COALESCE(?, title), \
             status = COALESCE(?, status), \
             processing_status = COALESCE(?, processing_status), \
             metadata = COALESCE(?, metadata), \
             updated_at = ? \
             WHERE video_id = ? RETURNING {}",
            VIDEO_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&changes.title)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.processing_status.map(i64::from))
            .bind(metadata_json(&changes.metadata))
            .bind(Utc::now().timestamp())
            .bind(remote_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => record_from_row(&row),
            None => Err(StoreError::NotFound(remote_id.to_string())),
        }
    }

    async fn delete(&self, remote_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM videos WHERE video_id = ?")
            .bind(remote_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<VideoRecord>, StoreError> {
        let sql = format!("SELECT {} FROM videos ORDER BY id", VIDEO_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::domain::video::{playable_link, DEFAULT_TITLE};
    use serde_json::json;
    use tempfile::tempdir;

    fn new_record(remote_id: &str) -> NewVideoRecord {
        NewVideoRecord {
            remote_video_id: remote_id.to_string(),
            remote_library_id: "42".to_string(),
            title: Some("First clip".to_string()),
            status: VideoState::Uploading,
            processing_status: 0,
            playable_link: Some(playable_link("42", remote_id)),
            metadata: Some(json!({ "guid": remote_id })),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_defaults() {
        let store = SqliteVideoStore::in_memory().await.unwrap();

        let first = store.insert(new_record("abc")).await.unwrap();
        let mut untitled = new_record("def");
        untitled.title = None;
        let second = store.insert(untitled).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.title, "First clip");
        assert_eq!(second.title, DEFAULT_TITLE);
        assert_eq!(first.status, VideoState::Uploading);
        assert_eq!(first.metadata, Some(json!({ "guid": "abc" })));
        assert_eq!(
            first.playable_link.as_deref(),
            Some("https://iframe.mediadelivery.net/play/42/abc")
        );
    }

    #[tokio::test]
    async fn test_insert_duplicate_remote_id() {
        let store = SqliteVideoStore::in_memory().await.unwrap();
        store.insert(new_record("abc")).await.unwrap();

        let result = store.insert(new_record("abc")).await;
        assert!(matches!(result, Err(StoreError::Duplicate(id)) if id == "abc"));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_remote_and_local_id() {
        let store = SqliteVideoStore::in_memory().await.unwrap();
        let inserted = store.insert(new_record("abc")).await.unwrap();

        let by_remote = store.find_by_remote_id("abc").await.unwrap();
        let by_id = store.find_by_id(inserted.id).await.unwrap();
        assert_eq!(by_remote.as_ref(), Some(&inserted));
        assert_eq!(by_id.as_ref(), Some(&inserted));

        assert!(store.find_by_remote_id("missing").await.unwrap().is_none());
        assert!(store.find_by_id(inserted.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let store = SqliteVideoStore::in_memory().await.unwrap();
        store.insert(new_record("abc")).await.unwrap();

        let updated = store
            .update("abc", RecordChanges::from_processing_code(3))
            .await
            .unwrap();

        assert_eq!(updated.status, VideoState::Success);
        assert_eq!(updated.processing_status, 3);
        assert_eq!(updated.title, "First clip");
        assert_eq!(updated.metadata, Some(json!({ "guid": "abc" })));

        let renamed = store
            .update(
                "abc",
                RecordChanges {
                    title: Some("Renamed".into()),
                    ..RecordChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Renamed");
        assert_eq!(renamed.status, VideoState::Success);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = SqliteVideoStore::in_memory().await.unwrap();
        let result = store
            .update("missing", RecordChanges::from_processing_code(4))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = SqliteVideoStore::in_memory().await.unwrap();
        store.insert(new_record("abc")).await.unwrap();

        assert!(store.delete("abc").await.unwrap());
        assert!(!store.delete("abc").await.unwrap());
        assert!(store.find_by_remote_id("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_in_insert_order() {
        let store = SqliteVideoStore::in_memory().await.unwrap();
        for id in ["c", "a", "b"] {
            store.insert(new_record(id)).await.unwrap();
        }

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.remote_video_id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("videos.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 2,
        };

        let store = SqliteVideoStore::connect(&config).await.unwrap();
        store.insert(new_record("abc")).await.unwrap();
        assert!(path.exists());

        // Schema bootstrap is idempotent across reconnects.
        drop(store);
        let reopened = SqliteVideoStore::connect(&config).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap().len(), 1);
    }
}
