//! Hot Potato game crate - phase state machine, prompt selection and round timer.
//!
//! The [`GameEngine`] owns the session state and drives a strict phase
//! machine: Lang -> Intro -> Playing -> Prompt -> Intro/Playing. It is
//! mutated only from a single event loop, so no locking is involved; timer
//! firings arrive as events carrying the [`TimerToken`] they were armed with,
//! and stale tokens are ignored.

pub mod engine;
pub mod error;
pub mod selection;
pub mod session;
pub mod state;
pub mod timer;
pub mod view;

pub use engine::{Command, GameEngine, GameSettings};
pub use error::GameError;
pub use selection::{eligible_prompts, RecentHistory, SelectionEngine};
pub use session::{PromptSlot, SessionState};
pub use state::{PhaseMachine, Trigger};
pub use timer::{random_delay, ManualScheduler, RoundTimer, Scheduler, TimerToken, TokioScheduler};
pub use view::{CategoryEntry, LanguageEntry, PromptDisplay, View};
