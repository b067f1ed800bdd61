//! focus - The netjack focus resource engine
//!
//! "Every keystroke costs something."
//!
//! Focus models a hacker's cognitive stamina as a consumable resource:
//! - Terminal commands cost focus, scaled by context and current fatigue
//! - Running low inflicts timed debuffs (delays, typos, hallucinations)
//! - Dropping to the threshold triggers a sticky overload
//! - Passive regeneration and stimulants restore it
//!
//! Each game session owns one [`FocusEngine`], usually wrapped in a
//! [`FocusSession`] that runs its regeneration timer.

pub mod action;
pub mod clock;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod session;
pub mod state;
pub mod stats;
pub mod stimulant;

pub use action::{calculate_focus_cost, ActionContext, FocusAction};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FocusConfig;
pub use effect::{EffectType, FocusEffect};
pub use engine::{ConsumeResult, FocusEngine, StimulantResult};
pub use error::FocusError;
pub use session::{FocusSession, SessionRegistry};
pub use state::FocusState;
pub use stats::FocusStats;
pub use stimulant::{Stimulant, StimulantType};
