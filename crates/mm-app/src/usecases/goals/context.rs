use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mm_core::goals::{GoalFlow, WizardState};
use tokio::sync::Mutex;

/// Shared wizard context containing state, dispatch lock and session generation.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: held for a whole dispatch, including the backend calls its actions make.
/// - `state`: short critical sections for reads and writes.
///
/// `reset` only takes `state`, so a new session can start while a calculation from the
/// previous one is still in flight. The bumped generation tells that dispatch to drop
/// its result.
#[derive(Clone)]
pub struct WizardContext {
    state: Arc<Mutex<WizardState>>,
    dispatch_lock: Arc<Mutex<()>>,
    generation: Arc<AtomicU64>,
}

impl WizardContext {
    pub fn new(initial_state: WizardState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial_state)),
            dispatch_lock: Arc::new(Mutex::new(())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn get_state(&self) -> WizardState {
        self.state.lock().await.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the state for a new wizard session.
    pub async fn reset(&self, state: WizardState) -> u64 {
        let mut guard = self.state.lock().await;
        *guard = state;
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Store `state` unless a reset happened since `generation` was read.
    ///
    /// Should only be called after acquiring `dispatch_lock`.
    pub async fn set_state_if_current(&self, state: WizardState, generation: u64) -> bool {
        let mut guard = self.state.lock().await;
        if self.generation() != generation {
            return false;
        }
        *guard = state;
        true
    }
}

impl Default for WizardContext {
    fn default() -> Self {
        Self::new(WizardState::new(GoalFlow::Setup))
    }
}
