use crate::domain::{DateKey, Mood, MoodTag, glyph_for};
use serde::{Deserialize, Serialize};

/// Row of `GET /journal/entries`. `preview` is computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub date: DateKey,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub preview: String,
}

impl EntrySummary {
    pub fn mood(&self) -> Option<Mood> {
        self.mood.as_deref().and_then(|m| m.parse().ok())
    }

    pub fn glyph(&self) -> Option<&'static str> {
        glyph_for(self.mood.as_deref())
    }
}

/// Body of `GET /journal/entry/{date}`.
///
/// `is_new` is a load-time signal that nothing is stored for the date yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: DateKey,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub is_new: bool,
}

impl JournalEntry {
    pub fn blank(date: DateKey) -> Self {
        Self {
            date,
            content: String::new(),
            mood: None,
            is_new: true,
        }
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood.as_deref().and_then(|m| m.parse().ok())
    }

    pub fn mood_tag(&self) -> Option<MoodTag> {
        self.mood.as_deref().and_then(MoodTag::parse)
    }
}

/// Body of `POST /journal/entry/{date}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub content: String,
    pub mood: Option<MoodTag>,
}

/// Reply to a save or delete.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MutationReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
