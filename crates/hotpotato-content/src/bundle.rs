//! Typed locale bundle.
//!
//! A bundle is parsed once into a typed schema (`ui`, `categories`,
//! `prompts`) and is immutable afterwards. The raw JSON tree is kept
//! alongside for free-form dotted-key lookups.

use serde::Deserialize;
use serde_json::Value;

use hotpotato_core::types::{Category, Language, Prompt, PromptId};

use crate::error::LoadError;

/// Interface strings of one locale.
///
/// Keys absent from a bundle fall back to the built-in English text, so a
/// partially translated bundle still renders every screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiText {
    pub tagline: String,
    pub language_select: String,
    pub lang_hint: String,
    pub select_language_aria: String,
    pub instructions_title: String,
    pub instructions: Vec<String>,
    pub start: String,
    pub support: String,
    pub change_language: String,
    pub safe_mode: String,
    pub playing_label: String,
    pub stop: String,
    pub mute: String,
    pub next_round: String,
    pub skip: String,
    pub pause_audio: String,
    pub support_title: String,
    pub close: String,
    pub footer: String,
    pub started_announce: String,
    pub paused_announce: String,
    pub prompt_announce: String,
    pub muted: String,
    pub sound_on: String,
    pub category_label: String,
    pub no_prompt: String,
}

impl Default for UiText {
    fn default() -> Self {
        Self {
            tagline: "Pass it on before it goes off!".to_string(),
            language_select: "Choose your language".to_string(),
            lang_hint: "You can change this later.".to_string(),
            select_language_aria: "Select language".to_string(),
            instructions_title: "How to play".to_string(),
            instructions: vec![
                "Sit in a circle and pass the phone around while the music plays.".to_string(),
                "When the music stops, whoever holds the phone reads the prompt aloud.".to_string(),
                "Talk it through together, then start the next round.".to_string(),
            ],
            start: "Start".to_string(),
            support: "Need support?".to_string(),
            change_language: "Change language".to_string(),
            safe_mode: "Safe mode".to_string(),
            playing_label: "Pass it on!".to_string(),
            stop: "Stop".to_string(),
            mute: "Mute".to_string(),
            next_round: "Next round".to_string(),
            skip: "Skip".to_string(),
            pause_audio: "Pause audio".to_string(),
            support_title: "Support".to_string(),
            close: "Close".to_string(),
            footer: "Hot Potato".to_string(),
            started_announce: "Round started".to_string(),
            paused_announce: "Round paused".to_string(),
            prompt_announce: "Time is up! Read the prompt.".to_string(),
            muted: "Muted".to_string(),
            sound_on: "Sound on".to_string(),
            category_label: "Category:".to_string(),
            no_prompt: "No prompts available. Enable some categories in the settings.".to_string(),
        }
    }
}

/// A prompt as written in a bundle: a bare string or a `{ "text": ... }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PromptEntry {
    Bare(String),
    Object { text: String },
}

impl PromptEntry {
    fn into_text(self) -> String {
        match self {
            PromptEntry::Bare(text) | PromptEntry::Object { text } => text,
        }
    }
}

/// A fully loaded and validated locale bundle.
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    language: Language,
    tree: Value,
    ui: UiText,
    categories: Vec<Category>,
    prompts: Vec<(String, Vec<Prompt>)>,
}

impl LocaleBundle {
    /// Parse and validate a bundle from raw JSON bytes.
    pub fn from_slice(language: Language, path: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let tree: Value =
            serde_json::from_slice(bytes).map_err(|e| LoadError::malformed(path, e))?;
        Self::from_value(language, path, tree)
    }

    /// Validate an already parsed JSON tree against the bundle schema.
    pub fn from_value(language: Language, path: &str, tree: Value) -> Result<Self, LoadError> {
        let root = tree
            .as_object()
            .ok_or_else(|| LoadError::invalid(path, "root is not an object"))?;

        let ui = match root.get("ui") {
            Some(value) => {
                UiText::deserialize(value).map_err(|e| LoadError::invalid(path, format!("ui: {}", e)))?
            }
            None => return Err(LoadError::invalid(path, "missing `ui`")),
        };

        let categories = root
            .get("categories")
            .and_then(Value::as_object)
            .ok_or_else(|| LoadError::invalid(path, "missing or non-object `categories`"))?
            .iter()
            .map(|(key, label)| match label.as_str() {
                Some(label) => Ok(Category {
                    key: key.clone(),
                    label: label.to_string(),
                }),
                None => Err(LoadError::invalid(
                    path,
                    format!("category `{}` label is not a string", key),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let prompts = root
            .get("prompts")
            .and_then(Value::as_object)
            .ok_or_else(|| LoadError::invalid(path, "missing or non-object `prompts`"))?
            .iter()
            .map(|(key, list)| {
                let entries = Vec::<PromptEntry>::deserialize(list).map_err(|e| {
                    LoadError::invalid(path, format!("prompts for `{}`: {}", key, e))
                })?;
                // Blank entries are dropped before numbering.
                let prompts = entries
                    .into_iter()
                    .map(PromptEntry::into_text)
                    .filter(|text| !text.trim().is_empty())
                    .enumerate()
                    .map(|(index, text)| Prompt {
                        id: PromptId::new(key, index),
                        category: key.clone(),
                        text,
                    })
                    .collect();
                Ok((key.clone(), prompts))
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        for (key, _) in &prompts {
            if !categories.iter().any(|c| &c.key == key) {
                tracing::debug!(category = %key, path, "Prompts listed for unknown category");
            }
        }

        Ok(Self {
            language,
            tree,
            ui,
            categories,
            prompts,
        })
    }

    /// Minimal bundle used when nothing could be loaded: English interface
    /// strings and no content.
    pub fn builtin(language: Language) -> Self {
        Self {
            language,
            tree: serde_json::json!({ "ui": {}, "categories": {}, "prompts": {} }),
            ui: UiText::default(),
            categories: Vec::new(),
            prompts: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn ui(&self) -> &UiText {
        &self.ui
    }

    /// Categories in bundle insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_label(&self, key: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.label.as_str())
    }

    /// Prompts of one category, in bundle order. Unknown categories are empty.
    pub fn prompts(&self, category: &str) -> &[Prompt] {
        self.prompts
            .iter()
            .find(|(key, _)| key == category)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Every category's prompt list, in bundle order.
    pub fn prompts_by_category(&self) -> impl Iterator<Item = (&str, &[Prompt])> {
        self.prompts
            .iter()
            .map(|(key, list)| (key.as_str(), list.as_slice()))
    }

    /// Walk the raw tree along a dotted key.
    ///
    /// Returns `None` as soon as a segment is missing or the path ends in null.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let mut current = &self.tree;
        for segment in key.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    /// Translate a dotted key to display text.
    ///
    /// Strings are returned verbatim; other values are rendered as JSON.
    /// Missing keys yield `fallback`, or the key itself when no fallback is
    /// given. Never fails.
    pub fn t(&self, key: &str, fallback: Option<&str>) -> String {
        match self.lookup(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => fallback.unwrap_or(key).to_string(),
        }
    }
}
