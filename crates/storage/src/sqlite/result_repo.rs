use quiz_core::model::{ResultId, ResultRecord, Verdict};

use super::SqliteRepository;
use super::mapping::{map_result_record, map_result_row, ser};
use crate::repository::{ResultRepository, ResultRow, StorageError};

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(&self, record: &ResultRecord) -> Result<ResultId, StorageError> {
        let answers_json = serde_json::to_string(record.answers()).map_err(ser)?;
        let passed = i64::from(record.verdict() == Verdict::Passed);

        let res = sqlx::query(
            r"
                INSERT INTO quiz_results (
                    username, answers_json, attempts, points, passed, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(record.username().as_str())
        .bind(answers_json)
        .bind(i64::from(record.attempts()))
        .bind(i64::from(record.points()))
        .bind(passed)
        .bind(record.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(ResultId::new(res.last_insert_rowid()))
    }

    async fn get_result(&self, id: ResultId) -> Result<ResultRecord, StorageError> {
        let row = sqlx::query(
            r"
                SELECT username, answers_json, attempts, points, passed, completed_at
                FROM quiz_results
                WHERE id = ?1
            ",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_result_record(&row)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, username, answers_json, attempts, points, passed, completed_at
                FROM quiz_results
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }
}
