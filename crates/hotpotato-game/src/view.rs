//! Read-only projection of the session for front ends.
//!
//! Everything here is a pure function of the session, the active bundle and
//! the mute flag. Front ends never read session state directly.

use hotpotato_content::{LocaleBundle, UiText};
use hotpotato_core::types::{Language, Phase, PromptId, Screen, LANGUAGES};

use crate::session::{PromptSlot, SessionState};

/// One button in the language grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    pub language: Language,
    pub native_name: &'static str,
    pub aria_label: String,
}

/// One row of the category list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub key: String,
    pub label: String,
    /// Enabled and not hidden by safe mode.
    pub checked: bool,
    /// Sensitive while safe mode is on; toggles are rejected.
    pub disabled: bool,
}

/// Text on the prompt screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDisplay {
    pub prompt_id: Option<PromptId>,
    pub text: String,
    /// `"{categoryLabel} {label}"`, empty for the no-prompt message.
    pub category_caption: String,
}

#[derive(Debug, Clone)]
pub struct View {
    pub phase: Phase,
    pub screen: Screen,
    pub language: Language,
    pub round: u64,
    pub safe_mode: bool,
    pub muted: bool,
    /// `ui.muted` or `ui.soundOn`.
    pub audio_status: String,
    pub support_open: bool,
    pub announcement: Option<String>,
    pub languages: Vec<LanguageEntry>,
    pub instructions: Vec<String>,
    pub categories: Vec<CategoryEntry>,
    pub prompt: Option<PromptDisplay>,
    pub decoration: Option<String>,
    pub ui: UiText,
}

impl View {
    pub fn build(session: &SessionState, bundle: &LocaleBundle, muted: bool) -> Self {
        let ui = bundle.ui();

        let languages = LANGUAGES
            .iter()
            .map(|&language| LanguageEntry {
                language,
                native_name: language.native_name(),
                aria_label: format!("{} {}", ui.select_language_aria, language.native_name()),
            })
            .collect();

        let categories = bundle
            .categories()
            .iter()
            .map(|c| CategoryEntry {
                key: c.key.clone(),
                label: c.label.clone(),
                checked: session.is_checked(&c.key),
                disabled: session.is_locked(&c.key),
            })
            .collect();

        let prompt = match session.prompt() {
            PromptSlot::Nothing => None,
            PromptSlot::Shown(p) => {
                let label = bundle.category_label(&p.category).unwrap_or(&p.category);
                Some(PromptDisplay {
                    prompt_id: Some(p.id.clone()),
                    text: p.text.clone(),
                    category_caption: format!("{} {}", ui.category_label, label),
                })
            }
            PromptSlot::Empty => Some(PromptDisplay {
                prompt_id: None,
                text: ui.no_prompt.clone(),
                category_caption: String::new(),
            }),
        };

        let phase = session.phase();
        Self {
            phase,
            screen: phase.screen(),
            language: bundle.language(),
            round: session.round,
            safe_mode: session.safe_mode,
            muted,
            audio_status: if muted { ui.muted.clone() } else { ui.sound_on.clone() },
            support_open: session.support_open,
            announcement: session.announcement.clone(),
            languages,
            instructions: ui.instructions.clone(),
            categories,
            prompt,
            decoration: session.decoration.clone(),
            ui: ui.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotpotato_core::types::Prompt;

    fn bundle() -> LocaleBundle {
        let json = r#"{
            "ui": {
                "categoryLabel": "Category:",
                "noPrompt": "Nothing to show",
                "muted": "Muted",
                "soundOn": "Sound on",
                "selectLanguageAria": "Pick",
                "instructions": ["Pass it", "Don't hold it"]
            },
            "categories": { "bullying": "Bullying", "racism": "Racism" },
            "prompts": { "bullying": [{ "text": "Say something kind" }] }
        }"#;
        LocaleBundle::from_slice(Language::En, "en.json", json.as_bytes()).unwrap()
    }

    #[test]
    fn test_view_lists_languages_with_aria() {
        let session = SessionState::new(Phase::Lang, false, 6);
        let view = View::build(&session, &bundle(), false);
        assert_eq!(view.screen, Screen::LanguageSelect);
        assert_eq!(view.languages.len(), 5);
        assert_eq!(view.languages[1].native_name, "Ελληνικά");
        assert_eq!(view.languages[1].aria_label, "Pick Ελληνικά");
        assert_eq!(view.instructions, vec!["Pass it", "Don't hold it"]);
    }

    #[test]
    fn test_view_categories_under_safe_mode() {
        let mut session = SessionState::new(Phase::Intro, true, 6);
        session.enabled.insert("bullying".to_string());
        session.enabled.insert("racism".to_string());
        let view = View::build(&session, &bundle(), false);

        let racism = view.categories.iter().find(|c| c.key == "racism").unwrap();
        assert!(!racism.checked);
        assert!(racism.disabled);
        let bullying = view.categories.iter().find(|c| c.key == "bullying").unwrap();
        assert!(bullying.checked);
        assert!(!bullying.disabled);
    }

    #[test]
    fn test_view_prompt_caption() {
        let mut session = SessionState::new(Phase::Prompt, false, 6);
        session.prompt = PromptSlot::Shown(Prompt {
            id: PromptId::new("bullying", 0),
            category: "bullying".to_string(),
            text: "Say something kind".to_string(),
        });
        let view = View::build(&session, &bundle(), false);
        let prompt = view.prompt.unwrap();
        assert_eq!(prompt.text, "Say something kind");
        assert_eq!(prompt.category_caption, "Category: Bullying");
        assert_eq!(prompt.prompt_id, Some(PromptId::new("bullying", 0)));
    }

    #[test]
    fn test_view_empty_prompt_message() {
        let mut session = SessionState::new(Phase::Prompt, false, 6);
        session.prompt = PromptSlot::Empty;
        let view = View::build(&session, &bundle(), false);
        let prompt = view.prompt.unwrap();
        assert_eq!(prompt.text, "Nothing to show");
        assert!(prompt.category_caption.is_empty());
        assert!(prompt.prompt_id.is_none());
    }

    #[test]
    fn test_view_audio_status() {
        let session = SessionState::new(Phase::Intro, false, 6);
        assert_eq!(View::build(&session, &bundle(), true).audio_status, "Muted");
        assert_eq!(View::build(&session, &bundle(), false).audio_status, "Sound on");
    }
}
