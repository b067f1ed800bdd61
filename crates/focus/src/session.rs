//! Focus sessions and their regeneration timer
//!
//! A [`FocusSession`] is one player's engine behind a mutex, plus the
//! background task that ticks it. Every call takes the lock, so timer ticks
//! and commands are serialized and never interleave mid-operation.
//!
//! The timer has an explicit lifecycle: [`FocusSession::start`] spawns it,
//! [`FocusSession::stop`] shuts it down, and dropping a session aborts a
//! timer that is still running.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::action::ActionContext;
use crate::config::FocusConfig;
use crate::effect::FocusEffect;
use crate::engine::{ConsumeResult, FocusEngine, StimulantResult};
use crate::error::{FocusError, Result};
use crate::state::FocusState;
use crate::stats::FocusStats;
use crate::stimulant::StimulantType;

/// Handle to a running regeneration task
struct RegenTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// A player's focus engine with its regeneration timer
pub struct FocusSession {
    id: String,
    engine: Arc<Mutex<FocusEngine>>,
    regen: Mutex<Option<RegenTask>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic inside an engine call leaves the state consistent enough to keep serving
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FocusSession {
    /// Wrap an engine; the timer is not started
    pub fn new(id: impl Into<String>, engine: FocusEngine) -> Self {
        Self {
            id: id.into(),
            engine: Arc::new(Mutex::new(engine)),
            regen: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Spawn the regeneration timer on the current Tokio runtime.
    ///
    /// Returns false if it was already running.
    pub fn start(&self) -> Result<bool> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| FocusError::NoRuntime)?;

        let mut regen = lock(&self.regen);
        if regen.is_some() {
            return Ok(false);
        }

        let period = lock(&self.engine).config().tick_interval();
        let engine = Arc::clone(&self.engine);
        let (shutdown, stopped) = oneshot::channel();
        let id = self.id.clone();

        let handle = runtime.spawn(regenerate(engine, period, stopped, id));
        *regen = Some(RegenTask { shutdown, handle });

        info!(session = %self.id, period_ms = period.as_millis() as u64, "Focus regeneration started");
        Ok(true)
    }

    /// Stop the regeneration timer and wait for it to finish.
    ///
    /// Returns false if it was not running.
    pub async fn stop(&self) -> bool {
        let task = lock(&self.regen).take();
        let Some(task) = task else {
            return false;
        };

        // The receiver is gone only if the task already ended
        let _ = task.shutdown.send(());
        if let Err(e) = task.handle.await {
            warn!(session = %self.id, error = %e, "Focus regeneration task failed");
        }

        info!(session = %self.id, "Focus regeneration stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        lock(&self.regen).is_some()
    }

    /// Run a closure with exclusive access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut FocusEngine) -> R) -> R {
        f(&mut lock(&self.engine))
    }

    pub fn calculate_cost(&self, command: &str, context: &ActionContext) -> u32 {
        lock(&self.engine).calculate_cost(command, context)
    }

    pub fn consume_focus(&self, command: &str, context: &ActionContext) -> ConsumeResult {
        lock(&self.engine).consume_focus(command, context)
    }

    pub fn use_stimulant(&self, stimulant_type: StimulantType) -> StimulantResult {
        lock(&self.engine).use_stimulant(stimulant_type)
    }

    pub fn use_stimulant_named(&self, name: &str) -> StimulantResult {
        lock(&self.engine).use_stimulant_named(name)
    }

    pub fn state(&self) -> FocusState {
        lock(&self.engine).state()
    }

    pub fn active_effects(&self) -> Vec<FocusEffect> {
        lock(&self.engine).active_effects()
    }

    pub fn focus_percentage(&self) -> f64 {
        lock(&self.engine).focus_percentage()
    }

    pub fn command_delay(&self) -> Duration {
        lock(&self.engine).command_delay()
    }

    pub fn apply_command_effects(&self, command: &str) -> String {
        lock(&self.engine).apply_command_effects(command)
    }

    pub fn stats(&self) -> FocusStats {
        lock(&self.engine).stats().clone()
    }
}

impl Drop for FocusSession {
    fn drop(&mut self) {
        let task = self
            .regen
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.handle.abort();
        }
    }
}

/// Ticks that were missed during a stall are not replayed back to back
fn regen_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn regenerate(
    engine: Arc<Mutex<FocusEngine>>,
    period: Duration,
    mut stopped: oneshot::Receiver<()>,
    id: String,
) {
    let mut interval = regen_interval(period);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = &mut stopped => break,
            _ = interval.tick() => {
                let mut engine = lock(&engine);
                engine.tick();
                debug!(session = %id, current = engine.focus_percentage(), "Focus tick");
            }
        }
    }
}

/// One focus session per game session id
pub struct SessionRegistry {
    config: FocusConfig,
    sessions: Mutex<HashMap<String, Arc<FocusSession>>>,
}

impl SessionRegistry {
    pub fn new(config: FocusConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session with a fresh engine and start its timer
    pub fn create(&self, id: &str) -> Result<Arc<FocusSession>> {
        self.insert(FocusSession::new(id, FocusEngine::new(self.config.clone())))
    }

    /// Register a prepared session and start its timer
    pub fn insert(&self, session: FocusSession) -> Result<Arc<FocusSession>> {
        let mut sessions = lock(&self.sessions);
        if sessions.contains_key(session.id()) {
            return Err(FocusError::SessionExists(session.id().to_string()));
        }

        session.start()?;
        let session = Arc::new(session);
        sessions.insert(session.id().to_string(), Arc::clone(&session));
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Result<Arc<FocusSession>> {
        lock(&self.sessions)
            .get(id)
            .cloned()
            .ok_or_else(|| FocusError::SessionNotFound(id.to_string()))
    }

    /// Unregister a session and stop its timer
    pub async fn remove(&self, id: &str) -> Result<()> {
        let session = lock(&self.sessions)
            .remove(id)
            .ok_or_else(|| FocusError::SessionNotFound(id.to_string()))?;
        session.stop().await;
        Ok(())
    }

    /// Session ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.sessions).keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.sessions).is_empty()
    }

    /// Stop and drop every session
    pub async fn stop_all(&self) {
        let sessions: Vec<Arc<FocusSession>> = lock(&self.sessions).drain().map(|(_, s)| s).collect();
        for session in sessions {
            session.stop().await;
        }
    }
}
