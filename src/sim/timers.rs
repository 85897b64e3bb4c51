//! Cooperative task handles
//!
//! The frame loop and the spawner are self-rescheduling tasks: each fires at
//! most once per schedule and has to be re-armed by its own callback. Any
//! phase transition away from `Playing` cancels them outright.

use serde::{Deserialize, Serialize};

/// Handle for a callback that reschedules itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeatingTask {
    /// Milliseconds until the next firing, `None` when not scheduled
    remaining_ms: Option<f32>,
}

impl RepeatingTask {
    /// Arm the task to fire after `delay_ms`
    pub fn schedule(&mut self, delay_ms: f32) {
        self.remaining_ms = Some(delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.remaining_ms.is_some()
    }

    pub fn remaining_ms(&self) -> Option<f32> {
        self.remaining_ms
    }

    /// Let time pass. Returns true when the task fires; a fired task is
    /// disarmed until its callback schedules it again.
    pub fn advance(&mut self, elapsed_ms: f32) -> bool {
        let Some(remaining) = self.remaining_ms.as_mut() else {
            return false;
        };
        *remaining -= elapsed_ms;
        if *remaining <= 0.0 {
            self.remaining_ms = None;
            true
        } else {
            false
        }
    }
}

/// What a delayed one-shot removes once it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    /// A tapped object, by id
    Object(u32),
    /// The transient effect spawned by the object with this id
    Effect(u32),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Pending {
    due_tick: u64,
    removal: Removal,
}

/// One-shot delayed removals keyed by originating object id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemovalQueue {
    pending: Vec<Pending>,
}

impl RemovalQueue {
    pub fn schedule(&mut self, removal: Removal, due_tick: u64) {
        self.pending.push(Pending { due_tick, removal });
    }

    /// Take every removal due at or before `now`, in scheduling order
    pub fn drain_due(&mut self, now: u64) -> Vec<Removal> {
        let mut due = Vec::new();
        self.pending.retain(|p| {
            if p.due_tick <= now {
                due.push(p.removal);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
