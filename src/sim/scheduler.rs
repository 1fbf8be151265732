//! Deferred one-shot actions on the simulation clock
//!
//! Actions carry the run they were scheduled in; the tick re-checks the run
//! state when one comes due and drops it if the world has moved on. Nothing
//! is ever cancelled explicitly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Clear the boss warning and spawn the zone's boss
    SpawnBoss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub due_tick: u64,
    /// Run that scheduled the action
    pub run_id: u32,
    pub action: ScheduledAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Vec<ScheduledEvent>,
}

impl Scheduler {
    /// Queue `action` to fire at `due_tick`. An identical action already
    /// pending for the same run is not duplicated.
    pub fn schedule(&mut self, due_tick: u64, run_id: u32, action: ScheduledAction) -> bool {
        if self
            .pending
            .iter()
            .any(|e| e.action == action && e.run_id == run_id)
        {
            return false;
        }
        self.pending.push(ScheduledEvent {
            due_tick,
            run_id,
            action,
        });
        true
    }

    /// Remove and return every action due at or before `now`, oldest first
    pub fn take_due(&mut self, now: u64) -> Vec<ScheduledEvent> {
        let mut due: Vec<ScheduledEvent> = self.pending.iter().filter(|e| e.due_tick <= now).copied().collect();
        self.pending.retain(|e| e.due_tick > now);
        due.sort_by_key(|e| e.due_tick);
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
