//! Reusable multi-party rendezvous.
//!
//! Every round, exactly `parties` callers must arrive at [`PhaseBarrier::wait`]
//! before any is released; a generation counter keeps late wakers from
//! skipping rounds, so the same barrier separates the two release points of
//! each filter iteration. [`PhaseBarrier::abort`] exists for startup failure:
//! it wakes every parked waiter and poisons all future waits, letting the
//! controller stop and join partially-started workers without deadlock.

use std::sync::{Condvar, Mutex};

/// Outcome of one barrier wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// All parties arrived; the round was released.
    Released,
    /// The barrier was aborted; the caller must stop participating.
    Aborted,
}

impl WaitOutcome {
    pub fn is_aborted(self) -> bool {
        matches!(self, WaitOutcome::Aborted)
    }
}

struct State {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

/// A reusable rendezvous for a fixed number of parties.
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<State>,
    cond: Condvar,
}

impl PhaseBarrier {
    pub fn new(parties: usize) -> Self {
        assert!(parties >= 1, "barrier needs at least one party");
        Self {
            parties,
            state: Mutex::new(State {
                arrived: 0,
                generation: 0,
                aborted: false,
            }),
            cond: Condvar::new(),
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Block until every party has arrived for the current round.
    ///
    /// The last arrival resets the count and bumps the generation, releasing
    /// the whole round together; the barrier is immediately reusable for the
    /// next round.
    pub fn wait(&self) -> WaitOutcome {
        let mut state = self.state.lock().expect("barrier lock poisoned");
        if state.aborted {
            return WaitOutcome::Aborted;
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.cond.notify_all();
            return WaitOutcome::Released;
        }

        let generation = state.generation;
        while state.generation == generation && !state.aborted {
            state = self.cond.wait(state).expect("barrier lock poisoned");
        }
        if state.aborted {
            WaitOutcome::Aborted
        } else {
            WaitOutcome::Released
        }
    }

    /// Wake every parked waiter and make all subsequent waits return
    /// [`WaitOutcome::Aborted`]. Terminal: an aborted barrier never releases
    /// another round.
    pub fn abort(&self) {
        let mut state = self.state.lock().expect("barrier lock poisoned");
        state.aborted = true;
        self.cond.notify_all();
    }
}
