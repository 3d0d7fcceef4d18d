//! End-to-end game flows across content, audio, timer and engine.
//!
//! Tests build their own engine over in-memory content, a recording audio
//! backend and a seeded RNG. Most use the manual scheduler and are fully
//! deterministic; the tokio scheduler test waits on short real timers.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use hotpotato_audio::{AudioCall, AudioChannel, MockAudioBackend};
use hotpotato_content::{LocaleStore, MemoryFetcher};
use hotpotato_core::events::GameEvent;
use hotpotato_core::prefs::{MemoryPreferenceStore, PreferenceStore};
use hotpotato_core::types::{Language, Phase, PromptId, Screen, SENSITIVE_CATEGORIES};
use hotpotato_game::{
    Command, GameEngine, GameError, GameSettings, ManualScheduler, RoundTimer, TimerToken,
    TokioScheduler,
};

// =============================================================================
// Helpers
// =============================================================================

/// English bundle: every sensitive category plus two ordinary ones, with
/// enough prompts that the ordinary pool alone exceeds the history length.
fn english_bundle() -> String {
    serde_json::json!({
        "ui": {
            "tagline": "Pass it on!",
            "categoryLabel": "Category:",
            "noPrompt": "No prompts for the selected categories",
            "startedAnnounce": "Round started",
            "pausedAnnounce": "Round paused",
            "promptAnnounce": "Time is up",
            "instructions": ["Sit in a circle", "Pass the potato"]
        },
        "categories": {
            "bullying": "Bullying",
            "sexual_harassment": "Sexual harassment",
            "teacher_to_student_abuse": "Teacher to student",
            "student_to_teacher_abuse": "Student to teacher",
            "racism": "Racism",
            "friendship": "Friendship"
        },
        "prompts": {
            "bullying": (0..5).map(|i| serde_json::json!({ "text": format!("bullying {}", i) })).collect::<Vec<_>>(),
            "sexual_harassment": [{ "text": "sh 0" }, { "text": "sh 1" }],
            "teacher_to_student_abuse": [{ "text": "tts 0" }],
            "student_to_teacher_abuse": [{ "text": "stt 0" }],
            "racism": [{ "text": "racism 0" }, { "text": "racism 1" }],
            "friendship": (0..4).map(|i| serde_json::json!({ "text": format!("friendship {}", i) })).collect::<Vec<_>>()
        }
    })
    .to_string()
}

struct Table {
    engine: GameEngine<MockAudioBackend, ManualScheduler, StdRng>,
    audio: MockAudioBackend,
    timers: ManualScheduler,
    fetcher: MemoryFetcher,
    prefs: MemoryPreferenceStore,
}

async fn table_with(stored: Option<Language>, seed: u64) -> Table {
    let fetcher = MemoryFetcher::new();
    fetcher.insert("locales/en.json", english_bundle());
    let prefs = stored
        .map(MemoryPreferenceStore::with_language)
        .unwrap_or_default();
    let audio = MockAudioBackend::new();
    let timers = ManualScheduler::new();
    let mut engine = GameEngine::new(
        LocaleStore::new(Arc::new(fetcher.clone())),
        Box::new(prefs.clone()),
        audio.clone(),
        timers.clone(),
        StdRng::seed_from_u64(seed),
        GameSettings::default(),
    );
    engine.init().await;
    Table {
        engine,
        audio,
        timers,
        fetcher,
        prefs,
    }
}

async fn table() -> Table {
    table_with(Some(Language::En), 1).await
}

/// Start a round and fire its timer.
fn play_until_prompt(t: &mut Table) -> Option<PromptId> {
    t.engine.start().unwrap();
    let token = *t.timers.pending().last().unwrap();
    assert!(t.engine.on_timer_fired(token));
    t.engine.view().prompt.and_then(|p| p.prompt_id)
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_no_repeat_within_six_picks_across_rounds() {
    for seed in 0..10 {
        let mut t = table_with(Some(Language::En), seed).await;
        let mut shown = Vec::new();
        shown.push(play_until_prompt(&mut t).unwrap());
        for i in 0..30 {
            if i % 3 == 0 {
                t.engine.next_round().unwrap();
                let token = *t.timers.pending().last().unwrap();
                t.engine.on_timer_fired(token);
            } else {
                t.engine.skip().unwrap();
            }
            shown.push(t.engine.view().prompt.unwrap().prompt_id.unwrap());
        }
        // Nine ordinary prompts are eligible, so no window of seven repeats.
        for window in shown.windows(7) {
            let unique: HashSet<&PromptId> = window.iter().collect();
            assert_eq!(unique.len(), 7, "seed {} repeated in {:?}", seed, window);
        }
    }
}

#[tokio::test]
async fn test_safe_mode_excludes_sensitive_prompts() {
    let mut t = table().await;
    // Enable everything first, then lock the sensitive set.
    for key in SENSITIVE_CATEGORIES {
        assert!(t.engine.toggle_category(key).unwrap());
    }
    t.engine.set_safe_mode(true);

    let view = t.engine.view();
    for entry in &view.categories {
        let sensitive = SENSITIVE_CATEGORIES.contains(&entry.key.as_str());
        assert_eq!(entry.disabled, sensitive);
        if sensitive {
            assert!(!entry.checked, "{} is checked in safe mode", entry.key);
        }
    }

    play_until_prompt(&mut t);
    for _ in 0..40 {
        let prompt = t.engine.view().prompt.unwrap();
        let id = prompt.prompt_id.unwrap();
        assert!(
            !SENSITIVE_CATEGORIES.iter().any(|k| id.as_str().starts_with(k)),
            "sensitive prompt {} shown in safe mode",
            id
        );
        t.engine.skip().unwrap();
    }
}

#[tokio::test]
async fn test_safe_mode_off_restores_enabled_sensitive_categories() {
    let mut t = table().await;
    t.engine.toggle_category("racism").unwrap();
    t.engine.set_safe_mode(true);
    assert!(!t.engine.view().categories.iter().any(|c| c.key == "racism" && c.checked));
    t.engine.set_safe_mode(false);
    assert!(t.engine.view().categories.iter().any(|c| c.key == "racism" && c.checked));
}

#[tokio::test]
async fn test_empty_pool_shows_message_and_keeps_running() {
    let mut t = table().await;
    t.engine.toggle_category("bullying").unwrap();
    t.engine.toggle_category("friendship").unwrap();

    assert_eq!(play_until_prompt(&mut t), None);
    let prompt = t.engine.view().prompt.unwrap();
    assert_eq!(prompt.text, "No prompts for the selected categories");
    assert_eq!(prompt.category_caption, "");

    t.engine.skip().unwrap();
    assert_eq!(t.engine.phase(), Phase::Prompt);
    t.engine.next_round().unwrap();
    assert_eq!(t.engine.phase(), Phase::Playing);
}

// =============================================================================
// Timer
// =============================================================================

#[tokio::test]
async fn test_first_timer_never_fires_after_stop_and_restart() {
    let mut t = table().await;

    t.engine.start().unwrap();
    let t1 = t.timers.pending()[0];
    t.engine.stop().unwrap();
    t.engine.start().unwrap();
    let t2 = t.timers.pending()[0];

    assert_ne!(t1, t2);
    assert_eq!(t.timers.pending(), vec![t2]);
    assert!(t.timers.cancelled().contains(&t1));

    // Even if T1's firing was already in flight, it is dropped.
    assert!(!t.engine.on_timer_fired(t1));
    assert_eq!(t.engine.phase(), Phase::Playing);
    assert!(t.engine.on_timer_fired(t2));
    assert_eq!(t.engine.phase(), Phase::Prompt);
}

#[tokio::test]
async fn test_every_exit_from_playing_cancels_the_timer() {
    let mut t = table().await;

    t.engine.start().unwrap();
    t.engine.stop().unwrap();
    assert!(!t.engine.timer().is_armed());

    t.engine.start().unwrap();
    t.engine.request_language_change().unwrap();
    assert!(!t.engine.timer().is_armed());
    assert!(t.timers.pending().is_empty());
}

#[tokio::test]
async fn test_tokio_scheduler_drives_engine() {
    let fetcher = MemoryFetcher::new();
    fetcher.insert("locales/en.json", english_bundle());
    let (scheduler, mut fired) = TokioScheduler::new();
    let settings = GameSettings {
        min_delay: Duration::from_millis(20),
        max_delay: Duration::from_millis(40),
        ..GameSettings::default()
    };
    let mut engine = GameEngine::new(
        LocaleStore::new(Arc::new(fetcher)),
        Box::new(MemoryPreferenceStore::with_language(Language::En)),
        MockAudioBackend::new(),
        scheduler,
        StdRng::seed_from_u64(3),
        settings,
    );
    engine.init().await;

    engine.start().unwrap();
    engine.stop().unwrap();
    engine.start().unwrap();

    let token = tokio::time::timeout(Duration::from_secs(5), fired.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(engine.on_timer_fired(token));
    assert_eq!(engine.phase(), Phase::Prompt);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(fired.try_recv().is_err());
}

#[test]
fn test_round_timer_tokens_are_unique() {
    let mut timer = RoundTimer::new(ManualScheduler::new());
    let tokens: HashSet<TimerToken> = (0..50)
        .map(|_| timer.arm(Duration::from_secs(10)))
        .collect();
    assert_eq!(tokens.len(), 50);
}

// =============================================================================
// Phase machine
// =============================================================================

#[tokio::test]
async fn test_playing_accepts_only_timer_and_stop() {
    let mut t = table().await;
    t.engine.start().unwrap();
    t.engine.drain_events();

    assert!(t.engine.skip().is_err());
    assert!(t.engine.next_round().is_err());
    assert!(t.engine.start().is_err());
    assert!(matches!(
        t.engine.choose_language(Language::El).await,
        Err(GameError::InvalidTrigger { phase: Phase::Playing, .. })
    ));
    assert_eq!(t.engine.phase(), Phase::Playing);
    assert_eq!(t.engine.session().round, 1);
    assert!(t.engine.timer().is_armed());
    assert!(t.engine.drain_events().is_empty());
}

#[tokio::test]
async fn test_screen_follows_phase() {
    let mut t = table_with(None, 1).await;
    let mut seen = Vec::new();
    seen.push(t.engine.view().screen);
    t.engine.choose_language(Language::En).await.unwrap();
    seen.push(t.engine.view().screen);
    play_until_prompt(&mut t);
    seen.push(t.engine.view().screen);
    t.engine.request_language_change().unwrap();
    seen.push(t.engine.view().screen);

    assert_eq!(
        seen,
        vec![
            Screen::LanguageSelect,
            Screen::Instructions,
            Screen::Prompt,
            Screen::LanguageSelect
        ]
    );
}

#[tokio::test]
async fn test_command_stream() {
    let mut t = table_with(None, 5).await;
    for line in ["lang en", "safe on", "mute", ""] {
        let command: Command = line.parse().unwrap();
        t.engine.execute(command).await.unwrap();
    }
    assert_eq!(t.engine.phase(), Phase::Playing);
    assert!(t.engine.session().safe_mode);
    assert!(t.engine.view().muted);
    assert_eq!(t.prefs.language(), Some(Language::En));
}

// =============================================================================
// Content
// =============================================================================

#[tokio::test]
async fn test_lookup_fallback() {
    let t = table().await;
    assert_eq!(t.engine.t("ui.missing.key", Some("Fallback")), "Fallback");
    assert_eq!(t.engine.t("ui.missing.key", None), "ui.missing.key");
    assert_eq!(t.engine.t("ui.tagline", Some("Fallback")), "Pass it on!");
}

#[tokio::test]
async fn test_failed_language_load_keeps_last_good_bundle() {
    let mut t = table_with(None, 1).await;
    t.fetcher.insert("locales/el.json", "{ not json");
    t.engine.drain_events();

    t.engine.choose_language(Language::El).await.unwrap();

    assert_eq!(t.engine.phase(), Phase::Intro);
    assert_eq!(t.engine.locales().language(), Language::En);
    assert_eq!(t.engine.view().instructions, vec!["Sit in a circle", "Pass the potato"]);
    let events = t.engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::LanguageLoadFailed { language: Language::El, .. })));
    // The choice is still remembered for the next session.
    assert_eq!(t.prefs.language(), Some(Language::El));
}

#[tokio::test]
async fn test_unreachable_content_falls_back_to_builtin() {
    let fetcher = MemoryFetcher::new();
    let mut engine = GameEngine::new(
        LocaleStore::new(Arc::new(fetcher)),
        Box::new(MemoryPreferenceStore::new()),
        MockAudioBackend::new(),
        ManualScheduler::new(),
        StdRng::seed_from_u64(1),
        GameSettings::default(),
    );
    engine.init().await;

    assert_eq!(engine.phase(), Phase::Lang);
    let view = engine.view();
    assert!(view.categories.is_empty());
    assert!(!view.ui.start.is_empty());
}

#[tokio::test]
async fn test_language_switch_rebuilds_categories() {
    let mut t = table_with(None, 1).await;
    let greek = english_bundle().replace("\"Bullying\"", "\"Εκφοβισμός\"");
    t.fetcher.insert("locales/el.json", greek);

    t.engine.choose_language(Language::El).await.unwrap();
    let view = t.engine.view();
    assert_eq!(view.language, Language::El);
    let bullying = view.categories.iter().find(|c| c.key == "bullying").unwrap();
    assert_eq!(bullying.label, "Εκφοβισμός");
    assert!(bullying.checked);
}

// =============================================================================
// Audio
// =============================================================================

#[tokio::test]
async fn test_audio_sequence_for_one_round() {
    let mut t = table().await;
    t.audio.clear();
    play_until_prompt(&mut t);

    let calls: Vec<AudioCall> = t
        .audio
        .calls()
        .into_iter()
        .filter(|c| !matches!(c, AudioCall::SetMuted(_)))
        .collect();
    assert_eq!(
        calls,
        vec![
            AudioCall::Play {
                channel: AudioChannel::Background,
                looping: true,
                from_start: false,
                muted: false,
            },
            AudioCall::Pause(AudioChannel::Background),
            AudioCall::Play {
                channel: AudioChannel::Cue,
                looping: false,
                from_start: true,
                muted: false,
            },
        ]
    );
}

#[tokio::test]
async fn test_rejected_audio_does_not_break_rounds() {
    let fetcher = MemoryFetcher::new();
    fetcher.insert("locales/en.json", english_bundle());
    let timers = ManualScheduler::new();
    let mut engine = GameEngine::new(
        LocaleStore::new(Arc::new(fetcher)),
        Box::new(MemoryPreferenceStore::with_language(Language::En)),
        MockAudioBackend::rejecting(),
        timers.clone(),
        StdRng::seed_from_u64(1),
        GameSettings::default(),
    );
    engine.init().await;

    engine.start().unwrap();
    assert!(engine.on_timer_fired(timers.pending()[0]));
    assert_eq!(engine.phase(), Phase::Prompt);
}

#[tokio::test]
async fn test_start_muted_setting() {
    let fetcher = MemoryFetcher::new();
    fetcher.insert("locales/en.json", english_bundle());
    let audio = MockAudioBackend::new();
    let timers = ManualScheduler::new();
    let settings = GameSettings {
        start_muted: true,
        ..GameSettings::default()
    };
    let mut engine = GameEngine::new(
        LocaleStore::new(Arc::new(fetcher)),
        Box::new(MemoryPreferenceStore::with_language(Language::En)),
        audio.clone(),
        timers.clone(),
        StdRng::seed_from_u64(1),
        settings,
    );
    engine.init().await;
    engine.start().unwrap();

    assert!(audio
        .plays()
        .iter()
        .all(|p| matches!(p, AudioCall::Play { muted: true, .. })));
    assert_eq!(engine.view().audio_status, "Muted");
}
