//! focus - Inspect and drive the netjack focus engine
//!
//! "Every keystroke costs something."
//!
//! Usage:
//!   focus actions               Show the command cost table
//!   focus stimulants            Show the stimulant catalog
//!   focus cost <COMMAND>        Price a command against a chosen focus level
//!   focus sim <STEPS>...        Run a deterministic offline simulation
//!   focus play                  Interactive terminal with live regeneration

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use netjack_core::format::{self, color, BOLD, CYAN, GREEN, MAGENTA, RED, YELLOW};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use focus::action::ACTIONS;
use focus::{
    calculate_focus_cost, ActionContext, ConsumeResult, FocusAction, FocusConfig, FocusEffect, FocusEngine,
    FocusSession, FocusState, FocusStats, ManualClock, StimulantResult, StimulantType,
};

/// Focus - cognitive fatigue engine for the netjack terminal
#[derive(Parser)]
#[command(name = "focus")]
#[command(about = "Inspect and drive the netjack focus resource engine")]
#[command(version)]
#[command(after_help = r#"HOW FOCUS WORKS:
    Every terminal command costs focus. Long tasks, difficulty, pressure
    and long streaks raise the price; so do overload and low focus.
    At 20 focus or below you overload: costs double and regeneration
    halves until focus climbs back above 40 or you meditate/take a break.

SIM STEPS:
    scan                 Run a terminal command
    +coffee              Apply a stimulant (coffee, nootropic, energy,
                         meditate, break)
    wait:6000            Let time pass (ms), ticking regeneration

EXAMPLES:
    focus cost exploit --difficulty 5 --pressure 3
    focus cost backdoor --focus 25 --overloaded
    focus sim scan backdoor backdoor backdoor backdoor +meditate
    focus sim --seed 7 --json crack crack crack wait:10000 scan
    focus play --seed 42

CONFIG:
    ~/.config/netjack/focus.yaml (or --config PATH)
"#)]
struct Cli {
    /// Path to a focus.yaml tuning file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the command cost table
    #[command(alias = "a")]
    Actions,

    /// Show the stimulant catalog
    #[command(alias = "stims")]
    Stimulants,

    /// Price a command without running it
    Cost {
        /// Command line to price
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,

        /// Time already spent on the task (ms)
        #[arg(long, value_name = "MS")]
        time_spent: Option<i64>,

        /// Task difficulty
        #[arg(long)]
        difficulty: Option<f64>,

        /// Time pressure
        #[arg(long)]
        pressure: Option<f64>,

        /// Actions issued back to back
        #[arg(long)]
        consecutive: Option<u32>,

        /// Current focus level (default: maximum)
        #[arg(long)]
        focus: Option<f64>,

        /// Price as if overloaded
        #[arg(long)]
        overloaded: bool,
    },

    /// Run a deterministic offline simulation
    #[command(alias = "s")]
    Sim {
        /// Commands, +stimulants and wait:MS steps
        #[arg(required = true, num_args = 1..)]
        steps: Vec<String>,

        /// RNG seed (default: config seed, else 0)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated time between commands (ms)
        #[arg(long, default_value = "1000")]
        gap_ms: i64,

        /// Emit one JSON record per step
        #[arg(long)]
        json: bool,
    },

    /// Interactive terminal with live regeneration
    #[command(alias = "p")]
    Play {
        /// RNG seed (default: config seed, else entropy)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FocusConfig::load_from(path),
        None => FocusConfig::load(),
    }
    .context("Failed to load focus config")?;

    match cli.command {
        Commands::Actions => cmd_actions(),
        Commands::Stimulants => cmd_stimulants(),
        Commands::Cost {
            command,
            time_spent,
            difficulty,
            pressure,
            consecutive,
            focus,
            overloaded,
        } => {
            let context = ActionContext {
                time_spent_ms: time_spent,
                difficulty,
                pressure,
                consecutive_actions: consecutive,
            };
            cmd_cost(&config, &command.join(" "), &context, focus, overloaded)
        }
        Commands::Sim {
            steps,
            seed,
            gap_ms,
            json,
        } => cmd_sim(config, &steps, seed, gap_ms, json),
        Commands::Play { seed } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cmd_play(config, seed))
        }
    }
}

/// Show the command cost table
fn cmd_actions() -> Result<()> {
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "COMMAND COSTS"));
    println!();
    println!("  {:<12} {:>5} {:>11} {:>7}", "COMMAND", "COST", "COMPLEXITY", "STRESS");
    for action in ACTIONS {
        println!(
            "  {:<12} {:>5} {:>11} {:>7}",
            action.name, action.base_cost, action.complexity, action.stress_level
        );
    }
    println!();
    println!("Unlisted commands cost 5.");
    Ok(())
}

/// Show the stimulant catalog
fn cmd_stimulants() -> Result<()> {
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "STIMULANTS"));
    println!();
    for stimulant_type in StimulantType::ALL {
        let spec = stimulant_type.spec();
        let price = if spec.cost == 0 {
            "free".to_string()
        } else {
            format!("{}cr", spec.cost)
        };
        println!(
            "  {:<13} {:<24} +{:<4} {:>7}  {}",
            stimulant_type.as_str(),
            spec.name,
            spec.focus_boost,
            format::duration_ms(spec.duration_ms),
            price
        );
        if !spec.side_effects.is_empty() {
            println!("  {:<13} side effects: {}", "", spec.side_effects.join(", "));
        }
        if stimulant_type.is_reset() {
            println!("  {:<13} clears overload and all effects", "");
        }
    }
    Ok(())
}

/// Price a command against a synthetic state
fn cmd_cost(
    config: &FocusConfig,
    command: &str,
    context: &ActionContext,
    level: Option<f64>,
    overloaded: bool,
) -> Result<()> {
    let mut state = FocusState::new(config, Utc::now().timestamp_millis());
    if let Some(level) = level {
        state.set_current(level);
    }
    state.is_overloaded = overloaded;

    let action = FocusAction::lookup(command);
    let cost = calculate_focus_cost(&state, command, context);

    println!("  {}     {}", color(CYAN, "Command:"), command);
    println!("  {}   {}", color(CYAN, "Base cost:"), action.base_cost);
    println!(
        "  {}       {:.0}/{:.0}{}",
        color(CYAN, "Focus:"),
        state.current,
        state.maximum,
        if overloaded { " (overloaded)" } else { "" }
    );
    println!("  {}        {}", color(BOLD, "Cost:"), cost);
    Ok(())
}

/// One simulation step, for --json output
#[derive(Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum SimRecord<'a> {
    Command {
        command: &'a str,
        typed: String,
        #[serde(flatten)]
        result: ConsumeResult,
        delay_ms: u64,
        focus: f64,
        overloaded: bool,
    },
    Stimulant {
        name: &'a str,
        #[serde(flatten)]
        result: StimulantResult,
        focus: f64,
    },
    Wait {
        ms: i64,
        focus: f64,
        overloaded: bool,
    },
}

/// Advance simulated time, ticking regeneration once per interval
fn advance(engine: &mut FocusEngine, clock: &ManualClock, ms: i64) {
    let tick = (engine.config().tick_interval_ms as i64).max(1);
    for _ in 0..(ms / tick) {
        clock.advance(tick);
        engine.tick();
    }
    clock.advance(ms % tick);
}

/// Run a scripted session on a manual clock
fn cmd_sim(config: FocusConfig, steps: &[String], seed: Option<u64>, gap_ms: i64, json: bool) -> Result<()> {
    let seed = seed.or(config.seed).unwrap_or(0);
    let clock = ManualClock::new(Utc::now().timestamp_millis());
    let mut engine = FocusEngine::with_clock(config, Arc::new(clock.clone())).with_seed(seed);

    for step in steps {
        let record = if let Some(name) = step.strip_prefix('+') {
            let result = engine.use_stimulant_named(name);
            SimRecord::Stimulant {
                name,
                result,
                focus: engine.focus_percentage(),
            }
        } else if let Some(ms) = step.strip_prefix("wait:") {
            let ms: i64 = ms
                .parse()
                .with_context(|| format!("Invalid wait step: {}", step))?;
            advance(&mut engine, &clock, ms.max(0));
            SimRecord::Wait {
                ms,
                focus: engine.focus_percentage(),
                overloaded: engine.is_overloaded(),
            }
        } else {
            let typed = engine.apply_command_effects(step);
            let result = engine.consume_focus(step, &ActionContext::default());
            let delay = engine.command_delay();
            let record = SimRecord::Command {
                command: step,
                typed,
                result,
                delay_ms: delay.as_millis() as u64,
                focus: engine.focus_percentage(),
                overloaded: engine.is_overloaded(),
            };
            advance(&mut engine, &clock, gap_ms.max(0));
            record
        };

        if json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            print_record(&record);
        }
    }

    if !json {
        println!();
        print_stats(engine.stats());
    }
    Ok(())
}

fn print_record(record: &SimRecord<'_>) {
    match record {
        SimRecord::Command {
            command,
            typed,
            result,
            delay_ms,
            focus,
            overloaded,
        } => {
            let tag = if result.success {
                color(GREEN, "[ok]")
            } else {
                color(RED, "[!!]")
            };
            println!(
                "{} {:<24} -{:<3} [{}] {:>5.1}%{}",
                tag,
                format::truncate(command, 24),
                result.focus_used,
                format::bar(*focus, 20),
                focus,
                if *overloaded { color(RED, " OVERLOAD") } else { String::new() }
            );
            if typed.as_str() != *command {
                println!("     {} typed as '{}'", color(YELLOW, "typo:"), typed);
            }
            if *delay_ms > 0 {
                println!("     {} {}ms", color(YELLOW, "delay:"), delay_ms);
            }
            for effect in &result.effects {
                print_effect(effect, None);
            }
            println!("     {}", result.message);
        }
        SimRecord::Stimulant { result, focus, .. } => {
            let tag = if result.success {
                color(GREEN, "[+]")
            } else {
                color(RED, "[x]")
            };
            println!("{}  {} ({:.1}%)", tag, result.message, focus);
        }
        SimRecord::Wait { ms, focus, overloaded } => {
            println!(
                "{} waited {} -> {:.1}%{}",
                color(CYAN, "[..]"),
                format::duration_ms(*ms),
                focus,
                if *overloaded { " (overloaded)" } else { "" }
            );
        }
    }
}

fn print_effect(effect: &FocusEffect, now: Option<i64>) {
    let remaining = match now {
        Some(now) => format!(" {} left", format::duration_ms(effect.remaining_ms(now))),
        None => format!(" for {}", format::duration_ms(effect.duration_ms)),
    };
    println!(
        "     {} {} (severity {}){} - {}",
        color(MAGENTA, "effect:"),
        effect.effect_type,
        effect.severity,
        remaining,
        effect.description
    );
}

fn print_stats(stats: &FocusStats) {
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "SESSION STATS"));
    println!("  {}  {}", color(CYAN, "Commands:"), stats.commands_issued);
    println!(
        "  {}  {} ({}%)",
        color(CYAN, "Impaired:"),
        stats.commands_impaired,
        stats.impaired_rate()
    );
    println!(
        "  {}     {} (avg {})",
        color(CYAN, "Spent:"),
        stats.focus_spent,
        stats.average_cost()
    );
    println!("  {} {}", color(CYAN, "Overloads:"), stats.overloads);
    println!("  {}   {}", color(CYAN, "Effects:"), stats.effects_inflicted);
    println!(
        "  {}     {} used, {} refused",
        color(CYAN, "Stims:"),
        stats.stimulants_used,
        stats.stimulants_rejected
    );
}

fn print_status(session: &FocusSession) {
    let state = session.state();
    let now = Utc::now().timestamp_millis();

    println!(
        "{} [{}] {:.1}/{:.0}  {}",
        color(CYAN, &format::time(Local::now())),
        format::bar(state.percentage(), 30),
        state.current,
        state.maximum,
        if state.is_overloaded {
            color(RED, "OVERLOAD")
        } else {
            color(GREEN, "stable")
        }
    );
    for stimulant in &state.stimulants {
        println!(
            "     {} {} {} left",
            color(GREEN, "stim:"),
            stimulant.name,
            format::duration_ms(stimulant.remaining_ms(now))
        );
    }
    for effect in &state.effects {
        print_effect(effect, Some(now));
    }
}

/// Interactive terminal backed by a live session
async fn cmd_play(mut config: FocusConfig, seed: Option<u64>) -> Result<()> {
    if seed.is_some() {
        config.seed = seed;
    }
    let session = FocusSession::new("local", FocusEngine::new(config));
    session.start()?;

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "NETJACK TERMINAL"));
    println!("Commands: status, effects, stats, use <stimulant>, quit");
    println!();
    print_status(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("netjack> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "status" => print_status(&session),
            "effects" => {
                let effects = session.active_effects();
                if effects.is_empty() {
                    println!("No active effects");
                }
                let now = Utc::now().timestamp_millis();
                for effect in &effects {
                    print_effect(effect, Some(now));
                }
            }
            "stats" => print_stats(&session.stats()),
            _ => {
                if let Some(name) = line.strip_prefix("use ") {
                    let result = session.use_stimulant_named(name.trim());
                    let tag = if result.success { color(GREEN, "[+]") } else { color(RED, "[x]") };
                    println!("{} {}", tag, result.message);
                    continue;
                }

                let typed = session.apply_command_effects(line);
                if typed != line {
                    println!("{} your fingers slip: '{}'", color(YELLOW, "[typo]"), typed);
                }
                let result = session.consume_focus(line, &ActionContext::default());

                let delay = session.command_delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let tag = if result.success { color(GREEN, "[ok]") } else { color(RED, "[!!]") };
                println!(
                    "{} {} (-{} focus, {:.1}% left)",
                    tag,
                    result.message,
                    result.focus_used,
                    session.focus_percentage()
                );
                for effect in &result.effects {
                    print_effect(effect, None);
                }
            }
        }
    }

    session.stop().await;
    println!();
    print_stats(&session.stats());
    Ok(())
}
