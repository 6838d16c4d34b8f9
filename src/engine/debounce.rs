// src/engine/debounce.rs

//! Debounce coordinator.
//!
//! Holds at most one pending action: the most disruptive (lowest) stage seen
//! since the last fire, plus the deadline at which it should run.
//!
//! Every time the deadline moves, the generation counter is bumped. The
//! runtime arms its timer with `(deadline, generation)` and hands the
//! generation back on expiry; [`Debouncer::fire`] only accepts the generation
//! that is currently armed, so an expiry that raced with a reset is dropped.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::pipeline::StageIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    pub stage: StageIndex,
    pub deadline: Instant,
    pub generation: u64,
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingAction>,
    generation: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Record a classified action.
    ///
    /// Returns true if the action became the pending one (deadline reset to
    /// `now + delay`). A stage that is not more disruptive than the pending
    /// one is absorbed and the deadline is left alone.
    pub fn record(&mut self, stage: StageIndex, now: Instant) -> bool {
        if let Some(pending) = &self.pending {
            if stage >= pending.stage {
                debug!(stage, pending = pending.stage, "absorbed by pending action");
                return false;
            }
        }

        self.generation += 1;
        self.pending = Some(PendingAction {
            stage,
            deadline: now + self.delay,
            generation: self.generation,
        });
        true
    }

    /// Deadline and generation the timer should be armed with, if any.
    pub fn armed(&self) -> Option<(Instant, u64)> {
        self.pending.map(|p| (p.deadline, p.generation))
    }

    /// Consume the pending action if `generation` is the armed one.
    pub fn fire(&mut self, generation: u64) -> Option<StageIndex> {
        match self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                Some(pending.stage)
            }
            Some(pending) => {
                debug!(
                    fired = generation,
                    armed = pending.generation,
                    "ignoring stale debounce expiry"
                );
                None
            }
            None => None,
        }
    }
}
