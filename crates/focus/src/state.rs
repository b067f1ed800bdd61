//! Per-session focus state
//!
//! `current` is kept within `[0, maximum]` by every mutation that goes
//! through [`FocusState::set_current`].

use serde::{Deserialize, Serialize};

use crate::config::FocusConfig;
use crate::effect::FocusEffect;
use crate::stimulant::Stimulant;

/// The mutable focus record owned by one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusState {
    pub current: f64,
    pub maximum: f64,
    pub drain_rate: f64,
    pub regen_rate: f64,
    pub overload_threshold: f64,
    pub is_overloaded: bool,
    /// Epoch ms of the last consumption
    pub last_action: i64,
    pub effects: Vec<FocusEffect>,
    pub stimulants: Vec<Stimulant>,
}

impl FocusState {
    /// Fresh state at full focus
    pub fn new(config: &FocusConfig, now: i64) -> Self {
        Self {
            current: config.maximum,
            maximum: config.maximum,
            drain_rate: config.drain_rate,
            regen_rate: config.regen_rate,
            overload_threshold: config.overload_threshold,
            is_overloaded: false,
            last_action: now,
            effects: Vec::new(),
            stimulants: Vec::new(),
        }
    }

    pub fn set_current(&mut self, value: f64) {
        self.current = value.clamp(0.0, self.maximum);
    }

    /// `current / maximum` in 0..=1
    pub fn ratio(&self) -> f64 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }

    pub fn percentage(&self) -> f64 {
        self.ratio() * 100.0
    }

    /// Drop effects and stimulants whose duration has elapsed
    pub fn prune_expired(&mut self, now: i64) {
        self.effects.retain(|e| !e.is_expired(now));
        self.stimulants.retain(|s| s.is_active(now));
    }

    /// Leave overload and restore base rates
    pub fn clear_overload(&mut self, config: &FocusConfig) {
        self.is_overloaded = false;
        self.drain_rate = config.drain_rate;
        self.regen_rate = config.regen_rate;
    }

    pub fn active_stimulant_count(&self, now: i64) -> usize {
        self.stimulants.iter().filter(|s| s.is_active(now)).count()
    }
}
