//! Virtual-time task scheduler
//!
//! Every delayed reaction on the page (toast auto-dismiss, counter ticks,
//! simulated request latency) is queued here. Time never moves on its own:
//! the owner calls [`Scheduler::pop_due`] with a horizon and runs whatever
//! comes back, so tests and replays are fully deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Milliseconds of virtual time since the page was created
pub type Millis = u64;

/// Handle for a scheduled task, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    run_at: Millis,
    seq: u64,            // Tie-breaker so equal deadlines run in scheduling order
    id: TaskId,
    task: T,
    repeat_interval: Option<Millis>,
}

impl<T> PartialEq for ScheduledTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.run_at == other.run_at && self.seq == other.seq
    }
}

impl<T> Eq for ScheduledTask<T> {}

impl<T> PartialOrd for ScheduledTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTask<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (earliest first)
        other
            .run_at
            .cmp(&self.run_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deterministic timer queue
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    tasks: BinaryHeap<ScheduledTask<T>>,
    cancelled: HashSet<TaskId>,
    next_id: u64,
    next_seq: u64,
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            tasks: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Run `task` once, `delay` ms from now
    pub fn schedule_after(&mut self, delay: Millis, task: T) -> TaskId {
        let id = self.allocate_id();
        self.push(self.now.saturating_add(delay), id, task, None);
        id
    }

    /// Run `task` every `interval` ms until cancelled
    pub fn schedule_every(&mut self, interval: Millis, task: T) -> TaskId {
        // A zero interval would never let time advance past this task
        let interval = interval.max(1);
        let id = self.allocate_id();
        self.push(self.now.saturating_add(interval), id, task, Some(interval));
        id
    }

    /// Cancel a pending task. Unknown or already-run ids are ignored.
    pub fn cancel(&mut self, id: TaskId) {
        if self.tasks.iter().any(|t| t.id == id) {
            self.cancelled.insert(id);
        }
    }

    /// Number of live (not cancelled) tasks in the queue
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| !self.cancelled.contains(&t.id))
            .count()
    }

    /// Deadline of the earliest live task
    pub fn next_due(&self) -> Option<Millis> {
        self.tasks
            .iter()
            .filter(|t| !self.cancelled.contains(&t.id))
            .map(|t| t.run_at)
            .min()
    }

    /// Pop the next task due at or before `horizon`, moving the clock to its
    /// deadline. Repeating tasks are re-queued before being handed out, so
    /// the callback may cancel itself.
    pub fn pop_due(&mut self, horizon: Millis) -> Option<(TaskId, T)> {
        loop {
            let next = self.tasks.peek()?;
            if next.run_at > horizon {
                return None;
            }
            let task = self.tasks.pop()?;

            if self.cancelled.remove(&task.id) {
                continue;
            }

            self.now = self.now.max(task.run_at);

            // A repeat that would run past the end of time is dropped
            let next_run = task.repeat_interval.and_then(|i| task.run_at.checked_add(i));
            if let Some(run_at) = next_run {
                self.push(run_at, task.id, task.task.clone(), task.repeat_interval);
            }

            return Some((task.id, task.task));
        }
    }

    /// Move the clock forward to `time` without running anything
    pub fn settle(&mut self, time: Millis) {
        self.now = self.now.max(time);
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, run_at: Millis, id: TaskId, task: T, repeat_interval: Option<Millis>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(ScheduledTask {
            run_at,
            seq,
            id,
            task,
            repeat_interval,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, horizon: Millis) -> Vec<(Millis, &'static str)> {
        let mut out = Vec::new();
        while let Some((_, task)) = s.pop_due(horizon) {
            out.push((s.now(), task));
        }
        s.settle(horizon);
        out
    }

    #[test]
    fn test_runs_in_deadline_then_fifo_order() {
        let mut s = Scheduler::new();
        s.schedule_after(300, "late");
        s.schedule_after(100, "first");
        s.schedule_after(100, "second");

        assert_eq!(
            drain(&mut s, 1000),
            vec![(100, "first"), (100, "second"), (300, "late")]
        );
        assert_eq!(s.now(), 1000);
    }

    #[test]
    fn test_nothing_runs_before_deadline() {
        let mut s = Scheduler::new();
        s.schedule_after(500, "x");

        assert!(drain(&mut s, 499).is_empty());
        assert_eq!(drain(&mut s, 500), vec![(500, "x")]);
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let mut s = Scheduler::new();
        let id = s.schedule_after(10, "gone");
        s.schedule_after(20, "kept");
        s.cancel(id);

        assert_eq!(s.pending(), 1);
        assert_eq!(drain(&mut s, 100), vec![(20, "kept")]);
    }

    #[test]
    fn test_repeating_task_until_cancelled() {
        let mut s = Scheduler::new();
        let id = s.schedule_every(16, "tick");

        let mut ticks = 0;
        while let Some((got, _)) = s.pop_due(1000) {
            ticks += 1;
            if ticks == 3 {
                s.cancel(got);
            }
        }
        assert_eq!(id, TaskId(0));
        assert_eq!(ticks, 3);
        assert_eq!(s.now(), 48);
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn test_deadlines_saturate_at_end_of_time() {
        let mut s = Scheduler::new();
        s.settle(Millis::MAX - 10);
        s.schedule_after(100, "late");
        s.schedule_every(50, "tick");

        assert_eq!(s.next_due(), Some(Millis::MAX));
        assert_eq!(s.pop_due(Millis::MAX).unwrap().1, "late");
        assert_eq!(s.pop_due(Millis::MAX).unwrap().1, "tick");
        // No room left to repeat
        assert_eq!(s.next_due(), None);
    }
}
