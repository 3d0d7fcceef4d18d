use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Phase
// =============================================================================

/// The four mutually exclusive interaction phases.
///
/// Exactly one phase is active at any instant, and the visible screen is a
/// pure function of it (see [`Phase::screen`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Choosing a language.
    Lang,
    /// Instructions and the start button.
    Intro,
    /// Round timer armed, background loop playing.
    Playing,
    /// Cue played, prompt text shown.
    Prompt,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lang => write!(f, "lang"),
            Phase::Intro => write!(f, "intro"),
            Phase::Playing => write!(f, "playing"),
            Phase::Prompt => write!(f, "prompt"),
        }
    }
}

/// Screen shown to the players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    LanguageSelect,
    Instructions,
    Playing,
    Prompt,
}

impl Phase {
    /// The one screen visible while this phase is active.
    pub fn screen(&self) -> Screen {
        match self {
            Phase::Lang => Screen::LanguageSelect,
            Phase::Intro => Screen::Instructions,
            Phase::Playing => Screen::Playing,
            Phase::Prompt => Screen::Prompt,
        }
    }
}

// =============================================================================
// Language
// =============================================================================

/// Languages the game ships locale bundles for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    El,
    Bg,
    Mk,
    Sq,
}

/// Ordered list of supported languages, as shown in the language grid.
pub const LANGUAGES: &[Language] = &[
    Language::En,
    Language::El,
    Language::Bg,
    Language::Mk,
    Language::Sq,
];

impl Language {
    /// ISO 639-1 code, also the locale bundle file stem.
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::El => "el",
            Self::Bg => "bg",
            Self::Mk => "mk",
            Self::Sq => "sq",
        }
    }

    /// Name of the language written in that language.
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::El => "Ελληνικά",
            Self::Bg => "Български",
            Self::Mk => "Македонски",
            Self::Sq => "Shqip",
        }
    }

    /// Parse a language code (case-insensitive, tolerant of region tags).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        LANGUAGES.iter().copied().find(|l| l.code() == lang)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Categories and prompts
// =============================================================================

/// Categories hidden and disabled while safe mode is on.
pub const SENSITIVE_CATEGORIES: &[&str] = &[
    "sexual_harassment",
    "teacher_to_student_abuse",
    "student_to_teacher_abuse",
    "racism",
];

/// Returns whether `key` is in the fixed sensitive set.
pub fn is_sensitive(key: &str) -> bool {
    SENSITIVE_CATEGORIES.contains(&key)
}

/// A named grouping of prompts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

impl Category {
    pub fn is_sensitive(&self) -> bool {
        is_sensitive(&self.key)
    }
}

/// Identity of a prompt: `{category}-{index}`.
///
/// Stable only within one loaded locale bundle, since the index is the
/// position in that bundle's category list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PromptId(String);

impl PromptId {
    pub fn new(category: &str, index: usize) -> Self {
        Self(format!("{}-{}", category, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single displayable challenge, tagged with its category and identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub category: String,
    pub text: String,
}
