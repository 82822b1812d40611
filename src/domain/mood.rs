use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Worried,
    Anxious,
    Neutral,
}

impl Mood {
    /// Display order, also the order of the `1..6` key bindings.
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Worried,
        Mood::Anxious,
        Mood::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Worried => "worried",
            Mood::Anxious => "anxious",
            Mood::Neutral => "neutral",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Worried => "😟",
            Mood::Anxious => "😰",
            Mood::Neutral => "😐",
        }
    }

    /// Mood bound to a number key, 1-based.
    pub fn from_index(index: usize) -> Option<Mood> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mood '{0}'")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// Mood tag as held by the editor and sent back on save.
///
/// Tags outside the fixed set are kept verbatim, so saving an entry whose
/// mood this client doesn't know leaves that mood as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoodTag {
    Known(Mood),
    Other(String),
}

impl MoodTag {
    /// `None` for a blank tag.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(match raw.parse::<Mood>() {
            Ok(mood) => MoodTag::Known(mood),
            Err(UnknownMood(raw)) => MoodTag::Other(raw),
        })
    }

    pub fn known(&self) -> Option<Mood> {
        match self {
            MoodTag::Known(mood) => Some(*mood),
            MoodTag::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MoodTag::Known(mood) => mood.as_str(),
            MoodTag::Other(raw) => raw,
        }
    }
}

impl From<Mood> for MoodTag {
    fn from(mood: Mood) -> Self {
        MoodTag::Known(mood)
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker glyph for a raw mood tag as stored by the backend.
/// Unrecognised or missing tags have no glyph.
pub fn glyph_for(raw: Option<&str>) -> Option<&'static str> {
    raw.and_then(|raw| raw.parse::<Mood>().ok())
        .map(|mood| mood.glyph())
}
