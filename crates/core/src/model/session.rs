use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UsernameError {
    #[error("username cannot be empty")]
    Empty,
}

/// A confirmed, non-empty, trimmed username.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// # Errors
    ///
    /// Returns `UsernameError::Empty` if the value is blank after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UsernameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({:?})", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user's run through the question sequence.
///
/// `position` is always within `[0, length]`; `position == length` means the
/// user stepped past the last question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<Username>,
    position: usize,
    length: usize,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    pub fn set_username(&mut self, username: Username) {
        self.username = Some(username);
    }

    /// Start walking a sequence of `length` questions from the first one.
    pub fn begin(&mut self, length: usize) {
        self.length = length;
        self.position = 0;
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.length > 0 && self.position >= self.length
    }

    /// Move forward one question. Returns false when already finished.
    pub fn advance(&mut self) -> bool {
        if self.position >= self.length {
            return false;
        }
        self.position += 1;
        true
    }

    /// Move back one question. Returns false at the first question.
    pub fn retreat(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }
}
