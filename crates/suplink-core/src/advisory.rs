use serde::{Deserialize, Serialize};

/// Longest advisory title kept, in characters.
pub const MAX_TITLE_CHARS: usize = 120;

/// A short buyer-facing note shown while a search is loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryItem {
    pub title: String,
    #[serde(alias = "answer")]
    pub body: String,
}

impl AdvisoryItem {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Trims both fields and caps the title length. Returns `None` when
    /// either field is blank.
    #[must_use]
    pub fn cleaned(&self) -> Option<Self> {
        let title = self.title.trim();
        let body = self.body.trim();
        if title.is_empty() || body.is_empty() {
            return None;
        }
        Some(Self {
            title: title.chars().take(MAX_TITLE_CHARS).collect(),
            body: body.to_owned(),
        })
    }
}
