use sqlx::SqlitePool;
use crate::models::{AnalysisRecord, JobStatus};
use crate::types::AppResult;
use chrono::Utc;

pub struct DatabaseOperations;

impl DatabaseOperations {
    /// Insert a fresh `processing` record. Fails if the id already exists.
    pub async fn create_record(
        pool: &SqlitePool,
        id: &str,
        filename: &str,
        query: &str,
    ) -> AppResult<AnalysisRecord> {
        let record = AnalysisRecord {
            id: id.to_string(),
            filename: filename.to_string(),
            query: query.to_string(),
            status: JobStatus::Processing,
            result_text: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO analysis_records (id, filename, query, status, result_text, created_at)
            VALUES (?1, ?2, ?3, ?4, NULL, ?5)
            "#,
        )
        .bind(&record.id)
        .bind(&record.filename)
        .bind(&record.query)
        .bind(record.status)
        .bind(record.created_at)
        .execute(pool)
        .await?;

        Ok(record)
    }

    /// Insert a `processing` record unless one already exists for `id`.
    /// Returns true when a row was written.
    pub async fn ensure_record(
        pool: &SqlitePool,
        id: &str,
        filename: &str,
        query: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO analysis_records (id, filename, query, status, result_text, created_at)
            VALUES (?1, ?2, ?3, ?4, NULL, ?5)
            "#,
        )
        .bind(id)
        .bind(filename)
        .bind(query)
        .bind(JobStatus::Processing)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_record(pool: &SqlitePool, id: &str) -> AppResult<Option<AnalysisRecord>> {
        let record = sqlx::query_as::<_, AnalysisRecord>(
            "SELECT id, filename, query, status, result_text, created_at FROM analysis_records WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Move a `processing` record to a terminal state. Records already in a
    /// terminal state are left untouched and false is returned.
    pub async fn finish_record(
        pool: &SqlitePool,
        id: &str,
        status: JobStatus,
        result_text: &str,
    ) -> AppResult<bool> {
        debug_assert!(status.is_terminal());

        let result = sqlx::query(
            r#"
            UPDATE analysis_records
            SET status = ?1, result_text = ?2
            WHERE id = ?3 AND status = ?4
            "#,
        )
        .bind(status)
        .bind(result_text)
        .bind(id)
        .bind(JobStatus::Processing)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_completed(pool: &SqlitePool, id: &str, result_text: &str) -> AppResult<bool> {
        Self::finish_record(pool, id, JobStatus::Completed, result_text).await
    }

    pub async fn mark_failed(pool: &SqlitePool, id: &str, error_text: &str) -> AppResult<bool> {
        Self::finish_record(pool, id, JobStatus::Failed, error_text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_get_record() {
        let pool = test_pool().await;
        DatabaseOperations::create_record(&pool, "job-1", "q3.pdf", "What is the margin?")
            .await
            .unwrap();

        let record = DatabaseOperations::get_record(&pool, "job-1").await.unwrap().unwrap();
        assert_eq!(record.filename, "q3.pdf");
        assert_eq!(record.query, "What is the margin?");
        assert_eq!(record.status, JobStatus::Processing);
        assert!(record.result_text.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let pool = test_pool().await;
        assert!(DatabaseOperations::get_record(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_record_is_idempotent() {
        let pool = test_pool().await;
        assert!(DatabaseOperations::ensure_record(&pool, "job-2", "a.pdf", "q").await.unwrap());
        assert!(!DatabaseOperations::ensure_record(&pool, "job-2", "b.pdf", "other").await.unwrap());

        let record = DatabaseOperations::get_record(&pool, "job-2").await.unwrap().unwrap();
        assert_eq!(record.filename, "a.pdf");
    }

    #[tokio::test]
    async fn test_terminal_transition_happens_once() {
        let pool = test_pool().await;
        DatabaseOperations::create_record(&pool, "job-3", "a.pdf", "q").await.unwrap();

        assert!(DatabaseOperations::mark_failed(&pool, "job-3", "boom").await.unwrap());
        assert!(!DatabaseOperations::mark_completed(&pool, "job-3", "late").await.unwrap());

        let record = DatabaseOperations::get_record(&pool, "job-3").await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.result_text.as_deref(), Some("boom"));
    }
}
