//! Deterministic timer wheel over logical milliseconds.
//!
//! One scheduler drives every periodic and one-shot callback of a
//! component. Tasks fire in `(due, registration)` order; a handler may
//! cancel tasks between two pops and the cancellation takes effect
//! immediately.

use serde_json::json;

use crate::logging::{log, obj, v_str, Domain, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Once,
    Every(u64),
}

#[derive(Debug, Clone)]
struct Task<K> {
    id: TaskId,
    key: K,
    cadence: Cadence,
    next_due: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TaskId,
    pub key: K,
    pub due: u64,
}

#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    now: u64,
    next_id: u64,
    tasks: Vec<Task<K>>,
}

impl<K: Clone + std::fmt::Debug> Scheduler<K> {
    pub fn new(start_ms: u64) -> Self {
        Self { now: start_ms, next_id: 0, tasks: Vec::new() }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fire once, `delay_ms` from now.
    pub fn once(&mut self, delay_ms: u64, key: K) -> TaskId {
        self.register(Cadence::Once, delay_ms, key)
    }

    /// Fire every `period_ms`, first at now + period. A zero period is
    /// treated as one millisecond.
    pub fn every(&mut self, period_ms: u64, key: K) -> TaskId {
        let period = period_ms.max(1);
        self.register(Cadence::Every(period), period, key)
    }

    fn register(&mut self, cadence: Cadence, delay_ms: u64, key: K) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay_ms);
        log(
            Level::Debug,
            Domain::Scheduler,
            "register",
            obj(&[
                ("task", json!(id.0)),
                ("key", v_str(&format!("{:?}", key))),
                ("due", json!(due)),
            ]),
        );
        self.tasks.push(Task { id, key, cadence, next_due: due });
        id
    }

    /// Returns whether the task was still scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            log(Level::Debug, Domain::Scheduler, "cancel", obj(&[("task", json!(id.0))]));
        }
        removed
    }

    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            log(
                Level::Debug,
                Domain::Scheduler,
                "cancel_all",
                obj(&[("tasks", json!(self.tasks.len()))]),
            );
        }
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.iter().map(|t| t.next_due).min()
    }

    /// Pop the earliest task due at or before `now`, advancing logical
    /// time to its due time. When nothing is due, logical time moves to
    /// `now`. Time never moves backward.
    pub fn pop_due(&mut self, now: u64) -> Option<Fired<K>> {
        if now < self.now {
            return None;
        }
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due <= now)
            .min_by_key(|(_, t)| (t.next_due, t.id))
            .map(|(i, _)| i);

        let Some(idx) = idx else {
            self.now = now;
            return None;
        };

        let task = &mut self.tasks[idx];
        let fired = Fired { id: task.id, key: task.key.clone(), due: task.next_due };
        self.now = fired.due;
        match task.cadence {
            Cadence::Once => {
                self.tasks.remove(idx);
            }
            // a period past the end of time never comes due again
            Cadence::Every(period) => match task.next_due.checked_add(period) {
                Some(next) => task.next_due = next,
                None => {
                    self.tasks.remove(idx);
                }
            },
        }
        Some(fired)
    }

    /// Drain everything due up to `now`.
    pub fn advance_to(&mut self, now: u64) -> Vec<Fired<K>> {
        let mut out = Vec::new();
        while let Some(fired) = self.pop_due(now) {
            out.push(fired);
        }
        out
    }
}
