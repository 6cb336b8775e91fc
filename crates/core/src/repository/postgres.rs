use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ContentRepository, ImageUpdate, RepositoryError};
use crate::record::{ContentKind, ContentRecord, RecordId};

/// Database row representation of a record.
/// Maps to the `content_records` PostgreSQL table.
#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: Uuid,
    kind: String,
    created_at: DateTime<Utc>,
    fields: Json<Value>,
}

impl RecordRow {
    fn into_record(self) -> Result<ContentRecord, RepositoryError> {
        let corrupt = |reason: String| RepositoryError::Corrupt {
            kind: self.kind.clone(),
            id: self.id.to_string(),
            reason,
        };
        let kind: ContentKind = self.kind.parse().map_err(|e| corrupt(format!("{e}")))?;
        ContentRecord::from_stored(self.id.into(), kind, self.created_at, self.fields.0)
            .map_err(|e| corrupt(e.to_string()))
    }
}

fn encode_fields(record: &ContentRecord) -> Result<Json<Value>, RepositoryError> {
    record
        .body
        .to_stored()
        .map(Json)
        .map_err(|source| RepositoryError::Encode {
            kind: record.kind,
            id: record.id,
            source,
        })
}

/// PostgreSQL-backed repository; every kind shares one table keyed by
/// `(kind, id)` with the kind fields in a JSONB column.
#[derive(Debug, Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn find_all(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            "SELECT id, kind, created_at, fields FROM content_records \
             WHERE kind = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn find_one(
        &self,
        kind: ContentKind,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, RepositoryError> {
        let row: Option<RecordRow> = sqlx::query_as(
            "SELECT id, kind, created_at, fields FROM content_records WHERE kind = $1 AND id = $2",
        )
        .bind(kind.as_str())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RecordRow::into_record).transpose()
    }

    async fn create(&self, record: &ContentRecord) -> Result<(), RepositoryError> {
        let fields = encode_fields(record)?;
        let result = sqlx::query(
            "INSERT INTO content_records (id, kind, created_at, fields) VALUES ($1, $2, $3, $4)",
        )
        .bind(record.id.as_uuid())
        .bind(record.kind.as_str())
        .bind(record.created_at)
        .bind(fields)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(RepositoryError::Conflict {
                    kind: record.kind,
                    id: record.id,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update(
        &self,
        record: &ContentRecord,
        image: ImageUpdate,
    ) -> Result<Option<ContentRecord>, RepositoryError> {
        let fields = encode_fields(record)?;
        // On Keep, the stored `image` key is merged back over the new document.
        let row: Option<RecordRow> = sqlx::query_as(
            "UPDATE content_records \
             SET fields = CASE WHEN $4 THEN $3 \
                 ELSE $3 || jsonb_strip_nulls(jsonb_build_object('image', fields -> 'image')) END, \
                 updated_at = now() \
             WHERE kind = $1 AND id = $2 \
             RETURNING id, kind, created_at, fields",
        )
        .bind(record.kind.as_str())
        .bind(record.id.as_uuid())
        .bind(fields)
        .bind(image == ImageUpdate::Replace)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RecordRow::into_record).transpose()
    }

    async fn delete(
        &self,
        kind: ContentKind,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, RepositoryError> {
        let row: Option<RecordRow> = sqlx::query_as(
            "DELETE FROM content_records WHERE kind = $1 AND id = $2 \
             RETURNING id, kind, created_at, fields",
        )
        .bind(kind.as_str())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RecordRow::into_record).transpose()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
