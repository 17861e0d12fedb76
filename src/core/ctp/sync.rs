//! Request/response synchronization used by the login sequencer and queries
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::core::common::POISONED_MUTEX;

/// A latched done/error signal.
///
/// The requesting thread calls `reset`, issues the vendor request, then
/// `wait`s; the callback thread latches `done` or `error` when the
/// `is_last` response arrives. Latching means a response that lands before
/// the wait starts is not lost. `wait` consumes the latched value.
pub(crate) struct SyncSignal {
    state: Mutex<Option<bool>>,
    cond: Condvar,
}

impl SyncSignal {
    pub fn new() -> Self {
        SyncSignal {
            state: Mutex::new(None),
            cond: Condvar::new(),
        }
    }

    //----------------------------------------------------------------------------------------------
    pub fn reset(&self) {
        *self.state.lock().expect(POISONED_MUTEX) = None;
    }

    //----------------------------------------------------------------------------------------------
    pub fn done(&self) {
        *self.state.lock().expect(POISONED_MUTEX) = Some(true);
        self.cond.notify_all();
    }

    //----------------------------------------------------------------------------------------------
    pub fn error(&self) {
        *self.state.lock().expect(POISONED_MUTEX) = Some(false);
        self.cond.notify_all();
    }

    //----------------------------------------------------------------------------------------------
    /// Waits for the latched result. A timeout counts as failure.
    pub fn wait(&self, timeout: Duration) -> bool {
        let guard = self.state.lock().expect(POISONED_MUTEX);
        let (mut guard, _) = self
            .cond
            .wait_timeout_while(guard, timeout, |state| state.is_none())
            .expect(POISONED_MUTEX);
        guard.take().unwrap_or(false)
    }
}
