//! Game engine driving the full session lifecycle.
//!
//! The `GameEngine` owns the session state, the locale store, the audio
//! controller and the round timer. Every user command and every timer
//! firing goes through one `&mut self` method, so the single event loop that
//! owns the engine is the only writer. Each state change pushes a
//! [`GameEvent`] that callers collect with [`GameEngine::drain_events`].

use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use hotpotato_audio::{AudioBackend, AudioChannel, AudioController};
use hotpotato_content::{LocaleStore, MediaLibrary};
use hotpotato_core::config::HotPotatoConfig;
use hotpotato_core::events::GameEvent;
use hotpotato_core::prefs::PreferenceStore;
use hotpotato_core::types::{Language, Phase};

use crate::error::GameError;
use crate::selection::DEFAULT_HISTORY_LEN;
use crate::session::{PromptSlot, SessionState};
use crate::state::{PhaseMachine, Trigger};
use crate::timer::{random_delay, RoundTimer, Scheduler, TimerToken};
use crate::view::View;

/// Tunables the engine reads once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// Inclusive lower bound of the round delay.
    pub min_delay: Duration,
    /// Exclusive upper bound of the round delay.
    pub max_delay: Duration,
    pub history_len: usize,
    pub safe_mode: bool,
    pub start_muted: bool,
    /// Language loaded when no preference is stored.
    pub default_language: Language,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(30),
            history_len: DEFAULT_HISTORY_LEN,
            safe_mode: false,
            start_muted: false,
            default_language: Language::En,
        }
    }
}

impl GameSettings {
    pub fn from_config(config: &HotPotatoConfig) -> Result<Self, GameError> {
        let default_language = Language::parse(&config.content.default_language)
            .ok_or_else(|| GameError::UnknownLanguage(config.content.default_language.clone()))?;
        Ok(Self {
            min_delay: config.round.min_delay(),
            max_delay: config.round.max_delay(),
            history_len: config.round.history_len,
            safe_mode: config.game.safe_mode,
            start_muted: config.audio.start_muted,
            default_language,
        })
    }
}

/// A user command, parsed from one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start in intro, stop while playing, next round on the prompt screen.
    Primary,
    Start,
    Stop,
    Skip,
    NextRound,
    /// Go back to the language selector.
    ChangeLanguage,
    ChooseLanguage(Language),
    /// Set safe mode, or flip it when no value is given.
    SafeMode(Option<bool>),
    ToggleCategory(String),
    ToggleMute,
    PauseAudio,
    OpenSupport,
    CloseSupport,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = GameError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut words = input.split_whitespace();
        let head = words.next().unwrap_or("").to_ascii_lowercase();
        let arg = words.next();

        let command = match (head.as_str(), arg) {
            ("" | "space" | "go", None) => Command::Primary,
            ("start", None) => Command::Start,
            ("stop", None) => Command::Stop,
            ("skip", None) => Command::Skip,
            ("next" | "next-round", None) => Command::NextRound,
            ("lang" | "language", None) => Command::ChangeLanguage,
            ("lang" | "language", Some(code)) => Command::ChooseLanguage(
                Language::parse(code).ok_or_else(|| GameError::UnknownLanguage(code.to_string()))?,
            ),
            ("safe", None) => Command::SafeMode(None),
            ("safe", Some("on")) => Command::SafeMode(Some(true)),
            ("safe", Some("off")) => Command::SafeMode(Some(false)),
            ("toggle" | "cat", Some(key)) => Command::ToggleCategory(key.to_string()),
            ("mute", None) => Command::ToggleMute,
            ("pause", None) => Command::PauseAudio,
            ("support", None) => Command::OpenSupport,
            ("close", None) => Command::CloseSupport,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit" | "q", None) => Command::Quit,
            _ => return Err(GameError::UnknownCommand(input.trim().to_string())),
        };
        Ok(command)
    }
}

/// Owns one game session.
pub struct GameEngine<B: AudioBackend, S: Scheduler, R: Rng> {
    session: SessionState,
    locales: LocaleStore,
    media: MediaLibrary,
    audio: AudioController<B>,
    timer: RoundTimer<S>,
    prefs: Box<dyn PreferenceStore>,
    rng: R,
    settings: GameSettings,
    events: Vec<GameEvent>,
}

impl<B: AudioBackend, S: Scheduler, R: Rng> std::fmt::Debug for GameEngine<B, S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("session", &self.session)
            .field("locales", &self.locales)
            .field("audio", &self.audio)
            .field("timer_armed", &self.timer.armed())
            .finish()
    }
}

impl<B: AudioBackend, S: Scheduler, R: Rng> GameEngine<B, S, R> {
    pub fn new(
        locales: LocaleStore,
        prefs: Box<dyn PreferenceStore>,
        backend: B,
        scheduler: S,
        rng: R,
        settings: GameSettings,
    ) -> Self {
        let mut audio = AudioController::new(backend);
        if settings.start_muted {
            audio.set_muted(true);
        }
        Self {
            session: SessionState::new(Phase::Lang, settings.safe_mode, settings.history_len),
            locales,
            media: MediaLibrary::default(),
            audio,
            timer: RoundTimer::new(scheduler),
            prefs,
            rng,
            settings,
            events: Vec::new(),
        }
    }

    /// Load the starting bundle and media list and pick the initial phase.
    ///
    /// Starts in `intro` when a language preference is stored, else in
    /// `lang`. A failed load leaves the built-in bundle active.
    pub async fn init(&mut self) {
        let stored = self.prefs.language();
        let language = stored.unwrap_or(self.settings.default_language);

        self.load_language(language).await;
        self.media = MediaLibrary::discover(self.locales.fetcher().as_ref()).await;

        let initial = if stored.is_some() {
            Phase::Intro
        } else {
            Phase::Lang
        };
        self.session.phases = PhaseMachine::new(initial);
        self.session.ensure_categories(&self.locales.pool());

        tracing::info!(
            session_id = %self.session.id,
            phase = %initial,
            language = %self.locales.language(),
            "Game session started"
        );
        self.events.push(GameEvent::SessionStarted {
            session_id: self.session.id,
            phase: initial,
            timestamp: self.session.started_at,
        });
    }

    // =========================================================================
    // Phase commands
    // =========================================================================

    /// Persist the language, load its bundle and move to `intro`.
    pub async fn choose_language(&mut self, language: Language) -> Result<(), GameError> {
        self.session.phases.check(Trigger::ChooseLanguage)?;

        if let Err(e) = self.prefs.set_language(language) {
            tracing::warn!(language = %language, error = %e, "Failed to persist language");
        }
        self.load_language(language).await;
        self.session.ensure_categories(&self.locales.pool());
        self.fire(Trigger::ChooseLanguage)?;
        Ok(())
    }

    /// Return to the language selector from any phase.
    pub fn request_language_change(&mut self) -> Result<(), GameError> {
        self.timer.cancel();
        self.audio.pause(AudioChannel::Background);
        self.fire(Trigger::ChangeLanguage)?;
        Ok(())
    }

    /// Start a round: loop the background track and arm the timer.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.fire(Trigger::Start)?;
        self.session.round += 1;
        self.audio.play_loop();

        let delay = random_delay(&mut self.rng, self.settings.min_delay, self.settings.max_delay);
        let token = self.timer.arm(delay);
        self.session.announcement = Some(self.locales.active().ui().started_announce.clone());

        tracing::info!(round = self.session.round, %token, delay_ms = delay.as_millis() as u64, "Round started");
        self.events.push(GameEvent::RoundStarted {
            round: self.session.round,
            delay_ms: delay.as_millis() as u64,
        });
        Ok(())
    }

    /// Stop the running round without showing a prompt.
    pub fn stop(&mut self) -> Result<(), GameError> {
        self.fire(Trigger::Stop)?;
        self.audio.pause(AudioChannel::Background);
        self.session.announcement = Some(self.locales.active().ui().paused_announce.clone());

        tracing::info!(round = self.session.round, "Round stopped");
        self.events.push(GameEvent::RoundStopped {
            round: self.session.round,
        });
        Ok(())
    }

    /// Handle a round timer firing. Returns `false` if the token was stale.
    pub fn on_timer_fired(&mut self, token: TimerToken) -> bool {
        if !self.timer.take_if_current(token) {
            tracing::debug!(%token, "Ignoring stale timer");
            return false;
        }
        if let Err(e) = self.fire(Trigger::TimerFired) {
            tracing::debug!(%token, error = %e, "Timer fired outside a round");
            return false;
        }
        self.audio.pause(AudioChannel::Background);
        self.audio.play_once(AudioChannel::Cue);
        self.show_next_prompt();
        self.session.announcement = Some(self.locales.active().ui().prompt_announce.clone());
        true
    }

    /// Replace the prompt on screen with a new pick.
    pub fn skip(&mut self) -> Result<(), GameError> {
        self.fire(Trigger::Skip)?;
        self.show_next_prompt();
        Ok(())
    }

    /// Leave the prompt screen and immediately start the next round.
    pub fn next_round(&mut self) -> Result<(), GameError> {
        self.fire(Trigger::NextRound)?;
        self.start()
    }

    /// The single-key action: start, stop or next round depending on phase.
    pub fn primary_action(&mut self) -> Result<(), GameError> {
        match self.phase() {
            Phase::Intro => self.start(),
            Phase::Playing => self.stop(),
            Phase::Prompt => self.next_round(),
            Phase::Lang => Err(GameError::InvalidTrigger {
                phase: Phase::Lang,
                trigger: Trigger::Start,
            }),
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn set_safe_mode(&mut self, enabled: bool) {
        if self.session.safe_mode == enabled {
            return;
        }
        self.session.safe_mode = enabled;
        tracing::info!(enabled, "Safe mode changed");
        self.events.push(GameEvent::SafeModeChanged { enabled });
    }

    /// Flip one category. Returns whether it is now enabled.
    pub fn toggle_category(&mut self, key: &str) -> Result<bool, GameError> {
        if self.locales.active().category_label(key).is_none() {
            return Err(GameError::UnknownCategory(key.to_string()));
        }
        if self.session.is_locked(key) {
            return Err(GameError::CategoryLocked(key.to_string()));
        }
        let enabled = if self.session.enabled.remove(key) {
            false
        } else {
            self.session.enabled.insert(key.to_string());
            true
        };
        tracing::debug!(category = key, enabled, "Category toggled");
        self.events.push(GameEvent::CategoryToggled {
            key: key.to_string(),
            enabled,
        });
        Ok(enabled)
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.audio.toggle_mute();
        self.events.push(GameEvent::MuteChanged { muted });
        muted
    }

    /// Pause both audio channels without touching the phase or the timer.
    pub fn pause_all_audio(&mut self) {
        self.audio.pause_all();
    }

    pub fn open_support(&mut self) {
        self.session.support_open = true;
    }

    pub fn close_support(&mut self) {
        self.session.support_open = false;
    }

    /// Apply a parsed command.
    ///
    /// Choosing a language outside the selector first returns to it.
    /// `Help` and `Quit` belong to the front end and are no-ops here.
    pub async fn execute(&mut self, command: Command) -> Result<(), GameError> {
        match command {
            Command::Primary => self.primary_action(),
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::Skip => self.skip(),
            Command::NextRound => self.next_round(),
            Command::ChangeLanguage => self.request_language_change(),
            Command::ChooseLanguage(language) => {
                if self.phase() != Phase::Lang {
                    self.request_language_change()?;
                }
                self.choose_language(language).await
            }
            Command::SafeMode(value) => {
                let enabled = value.unwrap_or(!self.session.safe_mode);
                self.set_safe_mode(enabled);
                Ok(())
            }
            Command::ToggleCategory(key) => self.toggle_category(&key).map(|_| ()),
            Command::ToggleMute => {
                self.toggle_mute();
                Ok(())
            }
            Command::PauseAudio => {
                self.pause_all_audio();
                Ok(())
            }
            Command::OpenSupport => {
                self.open_support();
                Ok(())
            }
            Command::CloseSupport => {
                self.close_support();
                Ok(())
            }
            Command::Help | Command::Quit => Ok(()),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn locales(&self) -> &LocaleStore {
        &self.locales
    }

    pub fn timer(&self) -> &RoundTimer<S> {
        &self.timer
    }

    pub fn audio(&self) -> &AudioController<B> {
        &self.audio
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Dotted-key lookup against the active bundle.
    pub fn t(&self, key: &str, fallback: Option<&str>) -> String {
        self.locales.t(key, fallback)
    }

    pub fn view(&self) -> View {
        View::build(&self.session, self.locales.active(), self.audio.is_muted())
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn load_language(&mut self, language: Language) {
        match self.locales.load(language).await {
            Ok(_) => self.events.push(GameEvent::LanguageChanged { language }),
            Err(e) => {
                tracing::warn!(
                    language = %language,
                    kept = %self.locales.language(),
                    error = %e,
                    "Locale load failed, keeping previous bundle"
                );
                self.events.push(GameEvent::LanguageLoadFailed {
                    language,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Apply a trigger plus the bookkeeping every phase change shares.
    ///
    /// Leaving `playing` always cancels the round timer. A real phase change
    /// closes the support panel and refreshes the decoration.
    fn fire(&mut self, trigger: Trigger) -> Result<Phase, GameError> {
        let from = self.session.phase();
        let to = self.session.phases.fire(trigger)?;
        if from == to {
            return Ok(to);
        }

        if from == Phase::Playing {
            self.timer.cancel();
        }
        if from == Phase::Prompt {
            self.session.prompt = PromptSlot::Nothing;
        }
        self.session.support_open = false;
        self.session.decoration = match to {
            Phase::Playing | Phase::Prompt => self.media.pick(&mut self.rng),
            Phase::Lang | Phase::Intro => None,
        };

        tracing::debug!(%trigger, %from, %to, "Phase changed");
        self.events.push(GameEvent::PhaseChanged { from, to });
        Ok(to)
    }

    fn show_next_prompt(&mut self) {
        let pool = self.locales.pool();
        let picked = self.session.selection.pick(
            &pool,
            &self.session.enabled,
            self.session.safe_mode,
            &mut self.rng,
        );
        let round = self.session.round;
        self.session.prompt = match picked {
            Some(prompt) => {
                tracing::info!(round, prompt_id = %prompt.id, category = %prompt.category, "Prompt shown");
                self.events.push(GameEvent::PromptShown {
                    round,
                    prompt_id: prompt.id.clone(),
                    category: prompt.category.clone(),
                });
                PromptSlot::Shown(prompt)
            }
            None => {
                tracing::info!(round, "No eligible prompt");
                self.events.push(GameEvent::NoPromptAvailable { round });
                PromptSlot::Empty
            }
        };
    }
}

// =============================================================================
// Tests
// =============================================================================
