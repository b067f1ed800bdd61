//! Behavioral properties of the focus engine, driven through the public API.

use std::sync::Arc;

use focus::{ActionContext, FocusConfig, FocusEngine, ManualClock, StimulantType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const T0: i64 = 1_700_000_000_000;

fn engine_with_clock(seed: u64) -> (FocusEngine, ManualClock) {
    let clock = ManualClock::new(T0);
    let engine = FocusEngine::with_clock(FocusConfig::default(), Arc::new(clock.clone())).with_seed(seed);
    (engine, clock)
}

fn drain_to_overload(engine: &mut FocusEngine) {
    while engine.state().current > 20.0 {
        engine.consume_focus("backdoor", &ActionContext::default());
    }
}

#[test]
fn focus_stays_within_bounds_for_random_sequences() {
    const COMMANDS: [&str; 6] = ["help", "scan", "exploit", "backdoor", "bruteforce", "whoami"];
    let mut driver = StdRng::seed_from_u64(2024);

    for seed in 0..20 {
        let (mut engine, clock) = engine_with_clock(seed);
        for _ in 0..300 {
            match driver.gen_range(0..10) {
                0..=5 => {
                    let command = COMMANDS[driver.gen_range(0..COMMANDS.len())];
                    let context = ActionContext {
                        time_spent_ms: Some(driver.gen_range(0..60_000)),
                        difficulty: Some(driver.gen_range(0.0..5.0)),
                        pressure: None,
                        consecutive_actions: Some(driver.gen_range(0..12)),
                    };
                    engine.consume_focus(command, &context);
                }
                6 => {
                    let stimulant = StimulantType::ALL[driver.gen_range(0..StimulantType::ALL.len())];
                    engine.use_stimulant(stimulant);
                }
                _ => {
                    clock.advance(driver.gen_range(0..8_000));
                    engine.tick();
                }
            }

            let state = engine.state();
            assert!(state.current >= 0.0, "focus went negative: {}", state.current);
            assert!(state.current <= state.maximum, "focus exceeded maximum: {}", state.current);
        }
    }
}

#[test]
fn cost_is_stable_without_state_change() {
    let (engine, _clock) = engine_with_clock(0);
    let context = ActionContext::default();
    assert_eq!(engine.calculate_cost("help", &context), engine.calculate_cost("help", &context));
}

#[test]
fn context_multipliers_compound_in_order() {
    let (engine, _clock) = engine_with_clock(0);
    let context = ActionContext::default()
        .with_time_spent(40_000)
        .with_difficulty(5.0)
        .with_pressure(3.0)
        .with_consecutive_actions(8);

    let expected = (15.0_f64 * 1.5 * (1.0 + 5.0 * 0.2) * (1.0 + 3.0 * 0.1) * (1.0 + 3.0 * 0.1)).ceil() as u32;
    assert_eq!(engine.calculate_cost("exploit", &context), expected);
}

#[test]
fn same_command_costs_more_once_focus_is_low() {
    let (mut engine, _clock) = engine_with_clock(0);
    let context = ActionContext::default();
    let fresh = engine.calculate_cost("backdoor", &context);
    drain_to_overload(&mut engine);
    assert!(engine.calculate_cost("backdoor", &context) > fresh);
}

#[test]
fn depletion_degrades_instead_of_blocking() {
    let (mut engine, _clock) = engine_with_clock(11);
    drain_to_overload(&mut engine);

    let current = engine.state().current;
    let cost = engine.calculate_cost("bruteforce", &ActionContext::default());
    assert!(current < f64::from(cost));

    let result = engine.consume_focus("bruteforce", &ActionContext::default());
    assert!(!result.success);
    assert_eq!(result.focus_used, cost);
    assert!((1..=3).contains(&result.effects.len()));
    assert!(result.effects.iter().all(|e| (6..=10).contains(&e.severity)));
    assert_eq!(engine.state().current, 0.0);
    assert!(engine.is_overloaded());
}

#[test]
fn third_stimulant_waits_for_an_expiry() {
    let (mut engine, clock) = engine_with_clock(0);
    assert!(engine.use_stimulant(StimulantType::EnergyDrink).success);
    assert!(engine.use_stimulant(StimulantType::Nootropic).success);

    let refused = engine.use_stimulant(StimulantType::Caffeine);
    assert!(!refused.success);
    assert!(refused.message.contains("overdose"));

    // energy drink lasts 4 minutes
    clock.advance(4 * 60_000);
    let accepted = engine.use_stimulant(StimulantType::Caffeine);
    assert!(accepted.success);
    assert_eq!(accepted.stimulant.map(|s| s.stimulant_type), Some(StimulantType::Caffeine));
}

#[test]
fn meditation_resets_overload_immediately() {
    let (mut engine, _clock) = engine_with_clock(5);
    drain_to_overload(&mut engine);
    let state = engine.state();
    assert!(state.is_overloaded);
    assert!(!state.effects.is_empty());

    assert!(engine.use_stimulant(StimulantType::Meditation).success);

    let state = engine.state();
    assert!(!state.is_overloaded);
    assert!(state.effects.is_empty());
    assert_eq!(state.drain_rate, 1.0);
    assert_eq!(state.regen_rate, 0.5);
    assert!(engine.active_effects().is_empty());
    assert_eq!(engine.command_delay(), std::time::Duration::ZERO);
}

#[test]
fn regeneration_is_gated_by_last_action() {
    let (mut engine, clock) = engine_with_clock(0);
    engine.consume_focus("decrypt", &ActionContext::default());
    let after_action = engine.state().current;

    clock.advance(4_999);
    engine.tick();
    assert_eq!(engine.state().current, after_action);

    clock.advance(2);
    engine.tick();
    let regen_rate = engine.state().regen_rate;
    assert_eq!(engine.state().current, after_action + regen_rate);

    for _ in 0..100 {
        clock.advance(1_000);
        engine.tick();
    }
    assert_eq!(engine.state().current, 100.0);
}

#[test]
fn fresh_scan_scenario() {
    let (mut engine, _clock) = engine_with_clock(0);
    let result = engine.consume_focus("scan", &ActionContext::default());

    assert!(result.success);
    assert_eq!(result.focus_used, 5);
    assert_eq!(result.message, "Sharp focus maintained");
    assert_eq!(engine.state().current, 95.0);
    assert_eq!(engine.focus_percentage(), 95.0);
}

#[test]
fn backdoor_run_triggers_overload_on_crossing() {
    for seed in 0..10 {
        let (mut engine, _clock) = engine_with_clock(seed);
        let mut last = None;
        while engine.state().current > 20.0 {
            assert!(!engine.is_overloaded());
            last = Some(engine.consume_focus("backdoor", &ActionContext::default()));
        }

        let crossing = last.expect("at least one backdoor");
        assert!(crossing.success);
        assert!(crossing.overload_triggered);
        assert!(!crossing.effects.is_empty());
        assert!(engine.is_overloaded());
    }
}
