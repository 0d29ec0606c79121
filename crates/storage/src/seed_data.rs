use quiz_core::model::{Question, QuestionError, QuestionId};

use crate::repository::{QuestionRepository, StorageError};

/// `(question, options, answer)` rows for the bundled bank.
const DEFAULT_BANK: &[(&str, &[&str], usize)] = &[
    (
        "Which keyword declares an immutable binding in Rust?",
        &["let", "mut", "static"],
        0,
    ),
    (
        "What does HTTP stand for?",
        &[
            "HyperText Transfer Protocol",
            "High Throughput Transport Path",
            "Hosted Text Transfer Process",
        ],
        0,
    ),
    (
        "Which data structure works first in, first out?",
        &["Stack", "Queue", "Tree"],
        1,
    ),
    (
        "Which HTML element holds the largest heading?",
        &["<head>", "<h6>", "<h1>"],
        2,
    ),
    (
        "What is the time complexity of binary search?",
        &["O(n)", "O(log n)", "O(n log n)"],
        1,
    ),
    (
        "Which command creates a new git branch and switches to it?",
        &["git checkout -b", "git merge", "git stash"],
        0,
    ),
    (
        "Which SQL clause filters grouped rows?",
        &["WHERE", "ORDER BY", "HAVING"],
        2,
    ),
    (
        "Which port does HTTPS use by default?",
        &["80", "443", "8080"],
        1,
    ),
    (
        "What does CSS stand for?",
        &[
            "Cascading Style Sheets",
            "Computer Style Syntax",
            "Creative Sheet System",
        ],
        0,
    ),
    (
        "Which value is falsy in JavaScript?",
        &["\"0\"", "[]", "0"],
        2,
    ),
];

/// The bundled question bank used by the seeder and by local mode on first
/// launch.
///
/// # Errors
///
/// Returns `QuestionError` if a bundled row fails validation.
pub fn default_question_bank() -> Result<Vec<Question>, QuestionError> {
    DEFAULT_BANK
        .iter()
        .zip(1_u64..)
        .map(|((text, options, answer), id)| {
            Question::new(
                QuestionId::new(id),
                *text,
                options.iter().map(|o| (*o).to_owned()).collect(),
                *answer,
            )
        })
        .collect()
}

/// Write the bundled bank into `repo` when it holds no questions yet.
///
/// Returns the number of questions written.
///
/// # Errors
///
/// Returns `StorageError` on read or write failures.
pub async fn seed_if_empty(repo: &dyn QuestionRepository) -> Result<u32, StorageError> {
    if repo.count_questions().await? > 0 {
        return Ok(0);
    }
    let bank = default_question_bank()?;
    let mut written = 0_u32;
    for (position, question) in (0_u32..).zip(bank.iter()) {
        repo.upsert_question(position, question).await?;
        written += 1;
    }
    tracing::info!(written, "seeded default question bank");
    Ok(written)
}
