//! Stimulant catalog and active buffs

use serde::{Deserialize, Serialize};

/// Kind of stimulant offered by the terminal UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StimulantType {
    Caffeine,
    Nootropic,
    EnergyDrink,
    Meditation,
    Break,
}

/// Static catalog entry for a stimulant
#[derive(Debug, Clone, Copy)]
pub struct StimulantSpec {
    pub name: &'static str,
    pub focus_boost: f64,
    pub duration_ms: i64,
    pub side_effects: &'static [&'static str],
    /// Credits; deducted by the caller, not the engine
    pub cost: u32,
}

impl StimulantType {
    pub const ALL: [StimulantType; 5] = [
        StimulantType::Caffeine,
        StimulantType::Nootropic,
        StimulantType::EnergyDrink,
        StimulantType::Meditation,
        StimulantType::Break,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StimulantType::Caffeine => "caffeine",
            StimulantType::Nootropic => "nootropic",
            StimulantType::EnergyDrink => "energy_drink",
            StimulantType::Meditation => "meditation",
            StimulantType::Break => "break",
        }
    }

    /// Parse a stimulant name, accepting the UI button aliases too
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "caffeine" | "coffee" => Some(StimulantType::Caffeine),
            "nootropic" | "nootropics" => Some(StimulantType::Nootropic),
            "energy_drink" | "energy" => Some(StimulantType::EnergyDrink),
            "meditation" | "meditate" => Some(StimulantType::Meditation),
            "break" => Some(StimulantType::Break),
            _ => None,
        }
    }

    pub fn spec(&self) -> StimulantSpec {
        match self {
            StimulantType::Caffeine => StimulantSpec {
                name: "Synth-Coffee",
                focus_boost: 20.0,
                duration_ms: 5 * 60_000,
                side_effects: &["Jitters", "Crash when it wears off"],
                cost: 50,
            },
            StimulantType::Nootropic => StimulantSpec {
                name: "Nootropic Stack",
                focus_boost: 35.0,
                duration_ms: 10 * 60_000,
                side_effects: &["Mild headache"],
                cost: 150,
            },
            StimulantType::EnergyDrink => StimulantSpec {
                name: "Neon Rush Energy Drink",
                focus_boost: 30.0,
                duration_ms: 4 * 60_000,
                side_effects: &["Heart palpitations", "Sugar crash"],
                cost: 75,
            },
            StimulantType::Meditation => StimulantSpec {
                name: "Meditation",
                focus_boost: 50.0,
                duration_ms: 15 * 60_000,
                side_effects: &[],
                cost: 0,
            },
            StimulantType::Break => StimulantSpec {
                name: "Short Break",
                focus_boost: 25.0,
                duration_ms: 3 * 60_000,
                side_effects: &[],
                cost: 0,
            },
        }
    }

    /// Meditation and breaks also clear overload and every effect
    pub fn is_reset(&self) -> bool {
        matches!(self, StimulantType::Meditation | StimulantType::Break)
    }
}

impl std::fmt::Display for StimulantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An applied stimulant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulant {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub stimulant_type: StimulantType,
    pub focus_boost: f64,
    pub duration_ms: i64,
    pub side_effects: Vec<String>,
    /// Epoch ms
    pub applied_at: i64,
    pub cost: u32,
}

impl Stimulant {
    /// Instantiate a catalog entry applied at `now`.
    /// `seq` keeps ids unique when one type is applied twice in a millisecond.
    pub fn from_catalog(stimulant_type: StimulantType, seq: u64, now: i64) -> Self {
        let spec = stimulant_type.spec();
        Self {
            id: format!("stim-{}-{}-{}", stimulant_type.as_str(), now, seq),
            name: spec.name.to_string(),
            stimulant_type,
            focus_boost: spec.focus_boost,
            duration_ms: spec.duration_ms,
            side_effects: spec.side_effects.iter().map(|s| s.to_string()).collect(),
            applied_at: now,
            cost: spec.cost,
        }
    }

    pub fn is_active(&self, now: i64) -> bool {
        now - self.applied_at < self.duration_ms
    }

    pub fn remaining_ms(&self, now: i64) -> i64 {
        (self.applied_at + self.duration_ms - now).max(0)
    }
}
