use quiz_core::model::Question;

use super::SqliteRepository;
use super::mapping::{id_i64, map_question_row, ser, u32_from_i64};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(
        &self,
        position: u32,
        question: &Question,
    ) -> Result<(), StorageError> {
        let id = id_i64("question_id", question.id().value())?;
        let options_json = serde_json::to_string(question.options()).map_err(ser)?;
        let answer = i64::try_from(question.answer()).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO questions (id, position, question, options_json, answer)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                position = excluded.position,
                question = excluded.question,
                options_json = excluded.options_json,
                answer = excluded.answer
            ",
        )
        .bind(id)
        .bind(i64::from(position))
        .bind(question.text())
        .bind(options_json)
        .bind(answer)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
            other => StorageError::Connection(other.to_string()),
        })?;

        Ok(())
    }

    async fn list_questions(&self, limit: u32) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, position, question, options_json, answer
            FROM questions
            ORDER BY position ASC, id ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_question_row).collect()
    }

    async fn count_questions(&self) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        u32_from_i64("count", count)
    }
}
