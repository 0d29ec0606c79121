/// Keys the quiz reacts to, independent of the UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizKey {
    Enter,
    Space,
    /// `/` starts voice capture.
    Slash,
    /// Digits `1..=9`; option selection uses `digit - 1`.
    Digit(u8),
    /// Any other key, including modifiers and navigation keys.
    Other,
}

impl QuizKey {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Enter" => QuizKey::Enter,
            " " | "Spacebar" => QuizKey::Space,
            "/" => QuizKey::Slash,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c
                        .to_digit(10)
                        .filter(|d| *d > 0)
                        .and_then(|d| u8::try_from(d).ok())
                        .map_or(QuizKey::Other, QuizKey::Digit),
                    _ => QuizKey::Other,
                }
            }
        }
    }

    /// Zero-based option index for a digit key, if it fits `option_count`.
    #[must_use]
    pub fn option_index(&self, option_count: usize) -> Option<usize> {
        match self {
            QuizKey::Digit(d) => {
                let index = usize::from(*d).checked_sub(1)?;
                (index < option_count).then_some(index)
            }
            _ => None,
        }
    }
}
