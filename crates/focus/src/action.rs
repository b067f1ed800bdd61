//! Terminal command costs
//!
//! Every player-issued command draws focus. The base price comes from a
//! static table keyed by the command's first word; context and the live
//! focus state scale it multiplicatively.

use serde::{Deserialize, Serialize};

use crate::state::FocusState;

/// Static cost profile of a terminal command
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FocusAction {
    pub name: &'static str,
    pub base_cost: f64,
    pub complexity: u8,
    pub stress_level: u8,
}

/// Profile used for commands missing from the table
pub const DEFAULT_ACTION: FocusAction = FocusAction {
    name: "*",
    base_cost: 5.0,
    complexity: 3,
    stress_level: 3,
};

const fn action(name: &'static str, base_cost: f64, complexity: u8, stress_level: u8) -> FocusAction {
    FocusAction {
        name,
        base_cost,
        complexity,
        stress_level,
    }
}

pub const ACTIONS: &[FocusAction] = &[
    action("help", 1.0, 1, 1),
    action("clear", 1.0, 1, 1),
    action("ls", 1.0, 1, 1),
    action("cd", 1.0, 1, 1),
    action("cat", 2.0, 1, 1),
    action("status", 2.0, 1, 1),
    action("ping", 3.0, 2, 2),
    action("scan", 5.0, 3, 2),
    action("connect", 6.0, 3, 3),
    action("ssh", 6.0, 3, 3),
    action("trace", 7.0, 4, 4),
    action("nmap", 8.0, 4, 3),
    action("download", 8.0, 3, 4),
    action("upload", 10.0, 4, 5),
    action("decrypt", 12.0, 6, 5),
    action("firewall", 12.0, 6, 6),
    action("inject", 14.0, 7, 6),
    action("exploit", 15.0, 7, 6),
    action("crack", 18.0, 8, 7),
    action("backdoor", 20.0, 9, 8),
    action("bruteforce", 25.0, 9, 9),
];

impl FocusAction {
    /// Look up the profile for a command line by its first word
    pub fn lookup(command: &str) -> FocusAction {
        let verb = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        ACTIONS
            .iter()
            .find(|a| a.name == verb)
            .copied()
            .unwrap_or(DEFAULT_ACTION)
    }
}

/// Optional circumstances of a command that raise its cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionContext {
    /// Time already spent on the current task (ms)
    pub time_spent_ms: Option<i64>,
    pub difficulty: Option<f64>,
    pub pressure: Option<f64>,
    pub consecutive_actions: Option<u32>,
}

impl ActionContext {
    pub fn with_time_spent(mut self, ms: i64) -> Self {
        self.time_spent_ms = Some(ms);
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn with_consecutive_actions(mut self, count: u32) -> Self {
        self.consecutive_actions = Some(count);
        self
    }
}

/// Cost of `command` given the live state snapshot.
///
/// Multipliers compound in a fixed order: long task, difficulty, pressure,
/// action streak, overload, then a single low-focus band. The result is
/// rounded up.
pub fn calculate_focus_cost(state: &FocusState, command: &str, context: &ActionContext) -> u32 {
    let action = FocusAction::lookup(command);
    let mut cost = action.base_cost;

    if context.time_spent_ms.is_some_and(|ms| ms > 30_000) {
        cost *= 1.5;
    }
    if let Some(difficulty) = context.difficulty {
        cost *= 1.0 + difficulty * 0.2;
    }
    if let Some(pressure) = context.pressure {
        cost *= 1.0 + pressure * 0.1;
    }
    if let Some(streak) = context.consecutive_actions.filter(|&n| n > 5) {
        cost *= 1.0 + f64::from(streak - 5) * 0.1;
    }

    if state.is_overloaded {
        cost *= 2.0;
    }

    // Bands are exclusive: below 0.3 does not also take the 0.5 multiplier
    let ratio = state.ratio();
    if ratio < 0.3 {
        cost *= 1.8;
    } else if ratio < 0.5 {
        cost *= 1.4;
    }

    cost.ceil().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FocusConfig;

    fn state_at(current: f64) -> FocusState {
        let mut state = FocusState::new(&FocusConfig::default(), 0);
        state.set_current(current);
        state
    }

    #[test]
    fn test_lookup_known_and_default() {
        assert_eq!(FocusAction::lookup("scan").base_cost, 5.0);
        assert_eq!(FocusAction::lookup("  EXPLOIT 10.0.0.7 --port 22").base_cost, 15.0);
        assert_eq!(FocusAction::lookup("backdoor").complexity, 9);

        let unknown = FocusAction::lookup("rm -rf /");
        assert_eq!(unknown, DEFAULT_ACTION);
        assert_eq!(FocusAction::lookup(""), DEFAULT_ACTION);
    }

    #[test]
    fn test_table_names_unique() {
        let mut names: Vec<_> = ACTIONS.iter().map(|a| a.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ACTIONS.len());
    }

    #[test]
    fn test_base_cost_at_full_focus() {
        let state = state_at(100.0);
        assert_eq!(calculate_focus_cost(&state, "scan", &ActionContext::default()), 5);
        assert_eq!(calculate_focus_cost(&state, "unknowncmd", &ActionContext::default()), 5);
    }

    #[test]
    fn test_context_multipliers_compound_in_order() {
        let state = state_at(100.0);
        let context = ActionContext::default()
            .with_time_spent(40_000)
            .with_difficulty(5.0)
            .with_pressure(3.0)
            .with_consecutive_actions(8);

        let expected = (15.0_f64 * 1.5 * (1.0 + 5.0 * 0.2) * (1.0 + 3.0 * 0.1) * (1.0 + 3.0 * 0.1)).ceil() as u32;
        assert_eq!(expected, 77);
        assert_eq!(calculate_focus_cost(&state, "exploit", &context), expected);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let state = state_at(100.0);
        // exactly 30s and exactly 5 consecutive do not count
        let context = ActionContext::default()
            .with_time_spent(30_000)
            .with_consecutive_actions(5);
        assert_eq!(calculate_focus_cost(&state, "exploit", &context), 15);
    }

    #[test]
    fn test_zero_difficulty_is_neutral() {
        let state = state_at(100.0);
        let context = ActionContext::default().with_difficulty(0.0).with_pressure(0.0);
        assert_eq!(calculate_focus_cost(&state, "decrypt", &context), 12);
    }

    #[test]
    fn test_efficiency_bands_exclusive() {
        let context = ActionContext::default();
        // ratio 0.5 is not below 0.5
        assert_eq!(calculate_focus_cost(&state_at(50.0), "backdoor", &context), 20);
        assert_eq!(calculate_focus_cost(&state_at(40.0), "backdoor", &context), 28);
        // below 0.3 takes 1.8 only, never 1.8 * 1.4
        assert_eq!(calculate_focus_cost(&state_at(29.0), "backdoor", &context), 36);
    }

    #[test]
    fn test_overload_doubles_before_band() {
        let mut state = state_at(10.0);
        state.is_overloaded = true;
        // 5 * 2 * 1.8
        assert_eq!(calculate_focus_cost(&state, "scan", &ActionContext::default()), 18);
    }

    #[test]
    fn test_cost_rounds_up() {
        let state = state_at(40.0);
        // 1 * 1.4 = 1.4
        assert_eq!(calculate_focus_cost(&state, "help", &ActionContext::default()), 2);
    }
}
