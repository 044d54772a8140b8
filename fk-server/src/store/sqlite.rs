use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use fk_core::submission::{Fields, Submission};

use super::{RecordId, SubmissionStore};
use crate::error::ServerError;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS submissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        form_key TEXT NOT NULL,
        fields TEXT NOT NULL,
        timestamp INTEGER NOT NULL
    )
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS submissions_form_key ON submissions (form_key)";

/// SQLite-backed record store for production use.
///
/// Fields are stored as a JSON object.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to the database at `url` and create the schema if needed.
    pub async fn connect(url: &str) -> Result<Self, ServerError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| ServerError::Setup(format!("failed to connect to database: {e}")))?;

        Self::from_pool(pool).await
    }

    /// Use an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, ServerError> {
        for stmt in [CREATE_TABLE, CREATE_INDEX] {
            sqlx::query(stmt)
                .execute(&pool)
                .await
                .map_err(|e| ServerError::Setup(format!("failed to create schema: {e}")))?;
        }

        Ok(Self { pool })
    }
}

#[async_trait::async_trait(?Send)]
impl SubmissionStore for SqliteStore {
    async fn put(
        &self,
        form_key: &str,
        fields: &Fields,
        timestamp: u64,
    ) -> Result<RecordId, crate::Error> {
        let fields = serde_json::to_string(fields).map_err(|_| crate::Error::Unexpected)?;
        let timestamp = i64::try_from(timestamp).map_err(|_| crate::Error::Unexpected)?;

        let result = sqlx::query(
            "INSERT INTO submissions (form_key, fields, timestamp) VALUES (?1, ?2, ?3)",
        )
        .bind(form_key)
        .bind(fields)
        .bind(timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log::error!("failed to store submission: {e}");
            crate::Error::Store
        })?;

        RecordId::try_from(result.last_insert_rowid()).map_err(|_| crate::Error::Unexpected)
    }

    async fn query_by_form_key(&self, form_key: &str) -> Result<Vec<Submission>, crate::Error> {
        let rows = sqlx::query_as::<_, (String, String, i64)>(
            "SELECT form_key, fields, timestamp FROM submissions WHERE form_key = ?1 ORDER BY id",
        )
        .bind(form_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!("failed to query submissions: {e}");
            crate::Error::Store
        })?;

        rows.into_iter()
            .map(|(form_key, fields, timestamp)| {
                let fields: Fields =
                    serde_json::from_str(&fields).map_err(|_| crate::Error::Unexpected)?;
                let timestamp = u64::try_from(timestamp).map_err(|_| crate::Error::Unexpected)?;

                Ok(Submission::new(form_key, fields, timestamp))
            })
            .collect()
    }
}
