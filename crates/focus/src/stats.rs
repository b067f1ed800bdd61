//! Focus statistics
//!
//! Running counters for one engine, useful for end-of-run summaries:
//! - Commands issued and how many ran impaired
//! - Overloads and inflicted effects
//! - Stimulant usage

use serde::Serialize;

/// Aggregated focus statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FocusStats {
    /// Total commands charged
    pub commands_issued: u32,
    /// Commands that ran with insufficient focus
    pub commands_impaired: u32,
    /// Total focus charged (cost, not the clamped drain)
    pub focus_spent: u64,
    /// Times overload was entered
    pub overloads: u32,
    /// Effects inflicted, minor and severe
    pub effects_inflicted: u32,
    /// Stimulants applied
    pub stimulants_used: u32,
    /// Stimulant requests refused
    pub stimulants_rejected: u32,
}

impl FocusStats {
    pub fn record_command(&mut self, cost: u32, impaired: bool) {
        self.commands_issued += 1;
        self.focus_spent += u64::from(cost);
        if impaired {
            self.commands_impaired += 1;
        }
    }

    pub fn record_overload(&mut self, effects: usize) {
        self.overloads += 1;
        self.effects_inflicted += effects as u32;
    }

    pub fn record_minor_effect(&mut self) {
        self.effects_inflicted += 1;
    }

    pub fn record_stimulant(&mut self, accepted: bool) {
        if accepted {
            self.stimulants_used += 1;
        } else {
            self.stimulants_rejected += 1;
        }
    }

    /// Impaired commands as percentage (0-100)
    pub fn impaired_rate(&self) -> u32 {
        if self.commands_issued == 0 {
            return 0;
        }
        (self.commands_impaired * 100) / self.commands_issued
    }

    /// Mean cost per command, rounded down
    pub fn average_cost(&self) -> u64 {
        if self.commands_issued == 0 {
            return 0;
        }
        self.focus_spent / u64::from(self.commands_issued)
    }
}
