//! Wall-clock deferred actions
//!
//! Timers are owned by the level that scheduled them. When the level is
//! dropped its pending timers go with it.

use crate::stage::NodeId;

/// Action to run once a timer is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Remove the node from its parent (end of an exit animation)
    Detach(NodeId),
    /// Self-destruct a projectile that outlived its lifetime
    Expire(NodeId),
}

#[derive(Debug, Clone)]
struct Timer {
    due_ms: f64,
    seq: u64,
    action: TimerAction,
}

/// Pending timers ordered by due time, then by scheduling order
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run once the clock reaches `due_ms`
    pub fn schedule(&mut self, due_ms: f64, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            due_ms,
            seq,
            action,
        });
    }

    /// Remove and return every action due at `now_ms`, oldest deadline first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<TimerAction> {
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.due_ms <= now_ms {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|t| t.action).collect()
    }

    /// Drop every pending timer for `action`; returns how many were removed
    pub fn cancel(&mut self, action: TimerAction) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.action != action);
        before - self.timers.len()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
