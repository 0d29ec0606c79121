use quiz_core::model::{Question, QuestionId, ResultId, ResultRecord};
use sqlx::Row;

use crate::repository::{QuestionRecord, ResultRow, StorageError, result_record_from_parts};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn usize_from_i64(field: &'static str, v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let options_json: String = row.try_get("options_json").map_err(ser)?;
    let options: Vec<String> = serde_json::from_str(&options_json).map_err(ser)?;
    let record = QuestionRecord {
        id: question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        position: u32_from_i64("position", row.try_get::<i64, _>("position").map_err(ser)?)?,
        text: row.try_get("question").map_err(ser)?,
        options,
        answer: usize_from_i64("answer", row.try_get::<i64, _>("answer").map_err(ser)?)?,
    };
    Ok(record.into_question()?)
}

pub(crate) fn map_result_record(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<ResultRecord, StorageError> {
    let username: String = row.try_get("username").map_err(ser)?;
    let answers_json: String = row.try_get("answers_json").map_err(ser)?;
    let answers: Vec<Option<usize>> = serde_json::from_str(&answers_json).map_err(ser)?;
    let attempts = u32_from_i64("attempts", row.try_get::<i64, _>("attempts").map_err(ser)?)?;
    let points = u32_from_i64("points", row.try_get::<i64, _>("points").map_err(ser)?)?;
    let passed: i64 = row.try_get("passed").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;

    result_record_from_parts(&username, answers, attempts, points, passed != 0, completed_at)
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<ResultRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    Ok(ResultRow::new(ResultId::new(id), map_result_record(row)?))
}
