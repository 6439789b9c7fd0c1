//! Mood check-in responses
//!
//! Students report how they are feeling; each mood maps deterministically to
//! a fixed supportive response. Unknown values fall back to a default, so a
//! mood update can never fail.

use serde::{Deserialize, Serialize};

/// Recognized mood values for student check-ins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Stressed,
    Overwhelmed,
    /// Anything outside the recognized set
    #[default]
    Other,
}

impl Mood {
    /// Convert to the wire value
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Stressed => "stressed",
            Self::Overwhelmed => "overwhelmed",
            Self::Other => "other",
        }
    }

    /// Parse from free text, with fallback to `Other`
    pub fn from_str_or_other(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "great" => Self::Great,
            "good" => Self::Good,
            "okay" | "ok" => Self::Okay,
            "stressed" => Self::Stressed,
            "overwhelmed" => Self::Overwhelmed,
            _ => Self::Other,
        }
    }

    /// The fixed supportive response for this mood
    pub fn response(&self) -> &'static str {
        match self {
            Self::Great => {
                "That's wonderful to hear! Keep riding that momentum, and remember I'm here if you want to talk anything through."
            }
            Self::Good => {
                "Glad things are going well. I'm around whenever you need a study break or a chat."
            }
            Self::Okay => {
                "Okay is a perfectly fine place to be. Is there anything on your mind you'd like to talk about?"
            }
            Self::Stressed => {
                "Law school can be a lot sometimes. Take a breath - we can work through whatever is weighing on you, one piece at a time."
            }
            Self::Overwhelmed => {
                "That sounds really heavy. Let's slow down and take things one small step at a time. You don't have to carry it all at once."
            }
            Self::Other => {
                "Thanks for checking in. However you're feeling right now, I'm here to listen."
            }
        }
    }

    /// All recognized moods (excluding the fallback)
    pub fn all() -> &'static [Mood] {
        &[
            Self::Great,
            Self::Good,
            Self::Okay,
            Self::Stressed,
            Self::Overwhelmed,
        ]
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
