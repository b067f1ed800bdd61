//! The focus engine
//!
//! One engine per game session. It owns the [`FocusState`] and every rule
//! that mutates it:
//! - charging commands (with the overload and low-focus effect rolls)
//! - applying stimulants
//! - passive regeneration ticks
//! - read-side views used by the terminal UI
//!
//! Expired effects and stimulants are pruned lazily, both on regeneration
//! ticks and on state reads. The engine itself is single-threaded; wrap it
//! in a [`crate::session::FocusSession`] to share it with a timer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::action::{calculate_focus_cost, ActionContext};
use crate::clock::{Clock, SystemClock};
use crate::config::FocusConfig;
use crate::effect::{minor_effect, overload_effects, EffectIds, EffectType, FocusEffect};
use crate::state::FocusState;
use crate::stats::FocusStats;
use crate::stimulant::{Stimulant, StimulantType};

/// Delay per severity point of the worst command_delay effect
const DELAY_PER_SEVERITY_MS: u64 = 500;

pub const DEPLETED_MESSAGE: &str = "Insufficient focus! Command executed with severe impairment.";
pub const OVERDOSE_MESSAGE: &str = "Too many stimulants active! Risk of overdose.";

/// Outcome of charging a command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumeResult {
    /// False when focus could not cover the cost; the command still runs
    pub success: bool,
    pub focus_used: u32,
    /// Effects created by this call
    pub effects: Vec<FocusEffect>,
    /// Overload was entered by this call
    pub overload_triggered: bool,
    pub message: String,
}

/// Outcome of a stimulant request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StimulantResult {
    pub success: bool,
    pub stimulant: Option<Stimulant>,
    pub message: String,
}

impl StimulantResult {
    fn rejected(message: String) -> Self {
        Self {
            success: false,
            stimulant: None,
            message,
        }
    }
}

/// Status line for a focus percentage
pub fn focus_message(percentage: f64) -> &'static str {
    if percentage > 80.0 {
        "Sharp focus maintained"
    } else if percentage > 60.0 {
        "Focus slightly diminished"
    } else if percentage > 40.0 {
        "Focus wavering - consider a break"
    } else if percentage > 20.0 {
        "Mental fatigue setting in"
    } else {
        "Severe exhaustion - performance critically impaired"
    }
}

/// Per-session focus simulator
pub struct FocusEngine {
    config: FocusConfig,
    state: FocusState,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    effect_ids: EffectIds,
    stimulants_issued: u64,
    stats: FocusStats,
}

impl FocusEngine {
    /// Create an engine on the wall clock
    pub fn new(config: FocusConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an engine on a custom clock
    pub fn with_clock(config: FocusConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = FocusState::new(&config, clock.now_ms());

        Self {
            config,
            state,
            clock,
            rng,
            effect_ids: EffectIds::default(),
            stimulants_issued: 0,
            stats: FocusStats::default(),
        }
    }

    /// Reseed the random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    pub fn stats(&self) -> &FocusStats {
        &self.stats
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Price a command against the live state without charging it
    pub fn calculate_cost(&self, command: &str, context: &ActionContext) -> u32 {
        calculate_focus_cost(&self.state, command, context)
    }

    /// Charge a command.
    ///
    /// Running short of focus never blocks the command: focus drains to
    /// zero, overload is forced and the result reports `success: false`.
    pub fn consume_focus(&mut self, command: &str, context: &ActionContext) -> ConsumeResult {
        let now = self.clock.now_ms();
        let cost = self.calculate_cost(command, context);
        let charge = f64::from(cost);

        if self.state.current < charge {
            self.state.set_current(self.state.current - charge);
            // The command still runs, so it restarts the regeneration delay
            self.state.last_action = now;
            let effects = self.trigger_overload(now);
            self.stats.record_command(cost, true);
            warn!(command, cost, effects = effects.len(), "Focus depleted");

            return ConsumeResult {
                success: false,
                focus_used: cost,
                effects,
                overload_triggered: true,
                message: DEPLETED_MESSAGE.to_string(),
            };
        }

        self.state.set_current(self.state.current - charge);
        self.state.last_action = now;
        self.stats.record_command(cost, false);

        let mut effects = Vec::new();
        let mut overload_triggered = false;

        if self.state.current <= self.state.overload_threshold && !self.state.is_overloaded {
            effects.extend(self.trigger_overload(now));
            overload_triggered = true;
        }

        if self.state.current < self.config.low_focus_effect_threshold
            && self.rng.gen::<f64>() < self.config.low_focus_effect_chance
        {
            let effect = minor_effect(&mut self.rng, &mut self.effect_ids, now);
            debug!(effect = %effect.effect_type, severity = effect.severity, "Minor focus effect");
            self.state.effects.push(effect.clone());
            self.stats.record_minor_effect();
            effects.push(effect);
        }

        debug!(command, cost, current = self.state.current, "Focus consumed");

        ConsumeResult {
            success: true,
            focus_used: cost,
            effects,
            overload_triggered,
            message: focus_message(self.state.percentage()).to_string(),
        }
    }

    /// Enter overload; rates compound if it is already active
    fn trigger_overload(&mut self, now: i64) -> Vec<FocusEffect> {
        self.state.is_overloaded = true;
        self.state.drain_rate *= 1.5;
        self.state.regen_rate *= 0.5;

        let effects = overload_effects(&mut self.rng, &mut self.effect_ids, now);
        self.state.effects.extend(effects.iter().cloned());
        self.stats.record_overload(effects.len());

        info!(
            current = self.state.current,
            regen_rate = self.state.regen_rate,
            effects = effects.len(),
            "Focus overload"
        );
        effects
    }

    /// Apply a stimulant from the catalog
    pub fn use_stimulant(&mut self, stimulant_type: StimulantType) -> StimulantResult {
        let now = self.clock.now_ms();

        // Count only; expired entries stay until the next prune
        if self.state.active_stimulant_count(now) >= self.config.max_active_stimulants {
            self.stats.record_stimulant(false);
            warn!(stimulant = %stimulant_type, "Stimulant refused, overdose risk");
            return StimulantResult::rejected(OVERDOSE_MESSAGE.to_string());
        }

        let stimulant = Stimulant::from_catalog(stimulant_type, self.stimulants_issued, now);
        self.stimulants_issued += 1;
        self.state.set_current(self.state.current + stimulant.focus_boost);
        self.state.stimulants.push(stimulant.clone());
        self.stats.record_stimulant(true);

        let mut message = format!("{} applied. +{} focus.", stimulant.name, stimulant.focus_boost);
        if stimulant_type.is_reset() {
            self.state.clear_overload(&self.config);
            self.state.effects.clear();
            message.push_str(" Mind cleared.");
        }

        info!(stimulant = %stimulant_type, current = self.state.current, "Stimulant applied");

        StimulantResult {
            success: true,
            stimulant: Some(stimulant),
            message,
        }
    }

    /// Apply a stimulant by its UI name
    pub fn use_stimulant_named(&mut self, name: &str) -> StimulantResult {
        match StimulantType::from_str(name) {
            Some(stimulant_type) => self.use_stimulant(stimulant_type),
            None => {
                self.stats.record_stimulant(false);
                StimulantResult::rejected(format!("Unknown stimulant type: {}", name))
            }
        }
    }

    /// One passive regeneration step
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.state.prune_expired(now);

        if now - self.state.last_action > self.config.regen_delay_ms {
            self.state.set_current(self.state.current + self.state.regen_rate);
        }

        if self.state.is_overloaded && self.state.current > self.state.overload_threshold * 2.0 {
            self.state.clear_overload(&self.config);
            info!(current = self.state.current, "Focus overload cleared");
        }
    }

    /// Snapshot of the state, after pruning expired items
    pub fn state(&mut self) -> FocusState {
        self.state.prune_expired(self.clock.now_ms());
        self.state.clone()
    }

    pub fn active_effects(&self) -> Vec<FocusEffect> {
        let now = self.clock.now_ms();
        self.state
            .effects
            .iter()
            .filter(|e| !e.is_expired(now))
            .cloned()
            .collect()
    }

    pub fn active_stimulants(&self) -> Vec<Stimulant> {
        let now = self.clock.now_ms();
        self.state
            .stimulants
            .iter()
            .filter(|s| s.is_active(now))
            .cloned()
            .collect()
    }

    pub fn focus_percentage(&self) -> f64 {
        self.state.percentage()
    }

    pub fn is_overloaded(&self) -> bool {
        self.state.is_overloaded
    }

    /// Suggested output delay from the worst live command_delay effect.
    /// Advisory only; the caller does the waiting.
    pub fn command_delay(&self) -> Duration {
        let now = self.clock.now_ms();
        let worst = self
            .state
            .effects
            .iter()
            .filter(|e| e.effect_type == EffectType::CommandDelay && !e.is_expired(now))
            .map(|e| e.severity)
            .max()
            .unwrap_or(0);
        Duration::from_millis(u64::from(worst) * DELAY_PER_SEVERITY_MS)
    }

    /// Corrupt a typed command under typo injection.
    ///
    /// Each live typo effect gets a `severity * 0.1` chance to swap one
    /// character for a random lowercase letter. Engine state is untouched.
    pub fn apply_command_effects(&mut self, command: &str) -> String {
        let now = self.clock.now_ms();
        let severities: Vec<u8> = self
            .state
            .effects
            .iter()
            .filter(|e| e.effect_type == EffectType::TypoInjection && !e.is_expired(now))
            .map(|e| e.severity)
            .collect();

        let mut output = command.to_string();
        for severity in severities {
            if self.rng.gen::<f64>() < f64::from(severity) * 0.1 {
                output = inject_typo(&mut self.rng, &output);
            }
        }
        output
    }
}

/// Replace one random character with a random lowercase letter
fn inject_typo<R: Rng>(rng: &mut R, text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let index = rng.gen_range(0..chars.len());
    chars[index] = char::from(b'a' + rng.gen_range(0..26u8));
    chars.into_iter().collect()
}
