//! Timed debuffs inflicted by fatigue
//!
//! Effects are created when focus runs low or overload hits, and expire once
//! `now - start_time >= duration_ms`. Nothing expires them proactively; the
//! engine prunes them on reads and regeneration ticks.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Kind of debuff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    /// Output is held back before display
    CommandDelay,
    /// Phantom lines in command output
    Hallucination,
    /// Random characters swapped in typed commands
    TypoInjection,
    /// Scans report things that are not there
    FalsePositive,
    /// Recent context is forgotten
    MemoryLoss,
}

impl EffectType {
    pub const ALL: [EffectType; 5] = [
        EffectType::CommandDelay,
        EffectType::Hallucination,
        EffectType::TypoInjection,
        EffectType::FalsePositive,
        EffectType::MemoryLoss,
    ];

    /// Types eligible for minor low-focus effects
    pub const MINOR: [EffectType; 2] = [EffectType::CommandDelay, EffectType::TypoInjection];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectType::CommandDelay => "command_delay",
            EffectType::Hallucination => "hallucination",
            EffectType::TypoInjection => "typo_injection",
            EffectType::FalsePositive => "false_positive",
            EffectType::MemoryLoss => "memory_loss",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "command_delay" => Some(EffectType::CommandDelay),
            "hallucination" => Some(EffectType::Hallucination),
            "typo_injection" => Some(EffectType::TypoInjection),
            "false_positive" => Some(EffectType::FalsePositive),
            "memory_loss" => Some(EffectType::MemoryLoss),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EffectType::CommandDelay => "Neural lag - responses arrive late",
            EffectType::Hallucination => "Phantom data bleeding into the output",
            EffectType::TypoInjection => "Fingers slipping on the keys",
            EffectType::FalsePositive => "Scanners chasing ghosts",
            EffectType::MemoryLoss => "Short-term memory fragmenting",
        }
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active debuff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusEffect {
    pub id: String,
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    /// 1-10
    pub severity: u8,
    pub duration_ms: i64,
    /// Epoch ms
    pub start_time: i64,
    pub description: String,
}

impl FocusEffect {
    pub fn new(id: String, effect_type: EffectType, severity: u8, duration_ms: i64, now: i64) -> Self {
        Self {
            id,
            effect_type,
            severity,
            duration_ms,
            start_time: now,
            description: effect_type.description().to_string(),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now - self.start_time >= self.duration_ms
    }

    pub fn remaining_ms(&self, now: i64) -> i64 {
        (self.start_time + self.duration_ms - now).max(0)
    }
}

/// Monotonic id source for effects created within one engine
#[derive(Debug, Default)]
pub struct EffectIds {
    next: u64,
}

impl EffectIds {
    pub fn issue(&mut self, now: i64) -> String {
        let id = format!("effect-{}-{}", now, self.next);
        self.next += 1;
        id
    }
}

/// Roll the 1-3 severe effects that accompany an overload
pub fn overload_effects<R: Rng>(rng: &mut R, ids: &mut EffectIds, now: i64) -> Vec<FocusEffect> {
    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|_| {
            let effect_type = EffectType::ALL[rng.gen_range(0..EffectType::ALL.len())];
            let severity = rng.gen_range(6..=10);
            let duration_ms = rng.gen_range(10_000..40_000);
            FocusEffect::new(ids.issue(now), effect_type, severity, duration_ms, now)
        })
        .collect()
}

/// Roll a single minor low-focus effect
pub fn minor_effect<R: Rng>(rng: &mut R, ids: &mut EffectIds, now: i64) -> FocusEffect {
    let effect_type = EffectType::MINOR[rng.gen_range(0..EffectType::MINOR.len())];
    let severity = rng.gen_range(1..=3);
    let duration_ms = rng.gen_range(5_000..15_000);
    FocusEffect::new(ids.issue(now), effect_type, severity, duration_ms, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_effect_type_roundtrip() {
        for effect_type in EffectType::ALL {
            assert_eq!(EffectType::from_str(effect_type.as_str()), Some(effect_type));
        }
        assert_eq!(EffectType::from_str("TYPO_INJECTION"), Some(EffectType::TypoInjection));
        assert_eq!(EffectType::from_str("migraine"), None);
    }

    #[test]
    fn test_expiry_boundary() {
        let effect = FocusEffect::new("e".into(), EffectType::Hallucination, 7, 10_000, 1_000);
        assert!(!effect.is_expired(10_999));
        assert_eq!(effect.remaining_ms(10_999), 1);
        assert!(effect.is_expired(11_000));
        assert_eq!(effect.remaining_ms(20_000), 0);
    }

    #[test]
    fn test_overload_effect_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut ids = EffectIds::default();

        for _ in 0..200 {
            let effects = overload_effects(&mut rng, &mut ids, 0);
            assert!((1..=3).contains(&effects.len()));
            for effect in effects {
                assert!((6..=10).contains(&effect.severity));
                assert!((10_000..40_000).contains(&effect.duration_ms));
            }
        }
    }

    #[test]
    fn test_minor_effect_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut ids = EffectIds::default();

        for _ in 0..200 {
            let effect = minor_effect(&mut rng, &mut ids, 0);
            assert!(EffectType::MINOR.contains(&effect.effect_type));
            assert!((1..=3).contains(&effect.severity));
            assert!((5_000..15_000).contains(&effect.duration_ms));
        }
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let mut ids = EffectIds::default();
        let a = ids.issue(5);
        let b = ids.issue(5);
        assert_ne!(a, b);
    }
}
