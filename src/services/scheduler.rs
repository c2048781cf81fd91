//! One-shot timers polled by the event loop

use crate::pane::types::ChatroomId;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct ScheduledTask<J> {
    id: TaskId,
    due: Instant,
    scope: Option<ChatroomId>,
    job: J,
}

/// Deferred jobs, optionally scoped to a chatroom so they can be dropped
/// together when the room goes away
#[derive(Debug)]
pub struct Scheduler<J> {
    tasks: Vec<ScheduledTask<J>>,
    next_id: u64,
}

impl<J> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J> Scheduler<J> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(
        &mut self,
        now: Instant,
        delay: Duration,
        scope: Option<ChatroomId>,
        job: J,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due: now + delay,
            scope,
            job,
        });
        id
    }

    /// Removes and returns every job due at `now`, oldest deadline first
    pub fn drain_due(&mut self, now: Instant) -> Vec<J> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| task.due <= now);
        self.tasks = pending;
        due.sort_by_key(|task| (task.due, task.id));
        due.into_iter().map(|task| task.job).collect()
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Drops all jobs scoped to `room`; returns how many were dropped
    pub fn cancel_scope(&mut self, room: &ChatroomId) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|task| task.scope.as_ref() != Some(room));
        before - self.tasks.len()
    }

    #[must_use]
    pub fn pending_for(&self, room: &ChatroomId) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.scope.as_ref() == Some(room))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_run_only_when_due() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.schedule(start, Duration::from_millis(100), None, "late");
        scheduler.schedule(start, Duration::from_millis(10), None, "early");

        assert!(scheduler.drain_due(start).is_empty());
        assert_eq!(scheduler.drain_due(start + Duration::from_millis(50)), ["early"]);
        assert_eq!(scheduler.drain_due(start + Duration::from_millis(100)), ["late"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_same_deadline_keeps_insertion_order() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        let delay = Duration::from_millis(5);
        scheduler.schedule(start, delay, None, 1);
        scheduler.schedule(start, delay, None, 2);
        scheduler.schedule(start, Duration::ZERO, None, 0);
        assert_eq!(scheduler.drain_due(start + delay), [0, 1, 2]);
    }

    #[test]
    fn test_cancel_scope_drops_only_that_room() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        let kept = ChatroomId::from("kept");
        let dropped = ChatroomId::from("dropped");
        scheduler.schedule(start, Duration::ZERO, Some(dropped.clone()), "a");
        scheduler.schedule(start, Duration::ZERO, Some(kept.clone()), "b");
        scheduler.schedule(start, Duration::ZERO, Some(dropped.clone()), "c");
        scheduler.schedule(start, Duration::ZERO, None, "d");

        assert_eq!(scheduler.cancel_scope(&dropped), 2);
        assert_eq!(scheduler.pending_for(&dropped), 0);
        assert_eq!(scheduler.pending_for(&kept), 1);
        assert_eq!(scheduler.drain_due(start), ["b", "d"]);
    }

    #[test]
    fn test_cancel_single_task() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        let id = scheduler.schedule(start, Duration::ZERO, None, ());
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.drain_due(start).is_empty());
    }
}
