//! Deferred gameplay tasks on a virtual clock.
//!
//! Tasks never run on their own: the owner pops due tasks between ticks and
//! executes them on the same thread. Cancelling a task removes it outright, so a
//! cancelled task can never fire.

use tracing::trace;

use crate::entity::ghost::GhostPersonality;

/// Identifies one scheduled task. Handles are never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// The deferred actions the game knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// The current mode's time is up.
    ModeExpiry,
    /// Bring Pac-Man back after a death.
    RespawnPacman,
    /// Let a ghost out of the house.
    ReleaseGhost(GhostPersonality),
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    handle: TaskHandle,
    due_ms: u64,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to become due `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let due_ms = now_ms.saturating_add(delay_ms);
        self.tasks.push(ScheduledTask { handle, due_ms, task });
        trace!(?handle, ?task, due_ms, "Task scheduled");
        handle
    }

    /// Cancels a task. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|scheduled| scheduled.handle != handle);
        before != self.tasks.len()
    }

    /// Cancels every task matching `predicate` and returns how many were removed.
    pub fn cancel_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Task) -> bool,
    {
        let before = self.tasks.len();
        self.tasks.retain(|scheduled| !predicate(&scheduled.task));
        before - self.tasks.len()
    }

    /// Cancels everything. Returns how many tasks were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    /// Removes and returns the earliest task due at or before `now_ms`.
    ///
    /// Tasks due at the same time come out in the order they were scheduled.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, Task)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.due_ms <= now_ms)
            .min_by_key(|(_, scheduled)| (scheduled.due_ms, scheduled.handle))
            .map(|(index, _)| index)?;

        let scheduled = self.tasks.remove(index);
        Some((scheduled.due_ms, scheduled.task))
    }

    /// When a pending task is due, if it is still pending.
    pub fn deadline(&self, handle: TaskHandle) -> Option<u64> {
        self.tasks
            .iter()
            .find(|scheduled| scheduled.handle == handle)
            .map(|scheduled| scheduled.due_ms)
    }

    /// Pending tasks with their due times, in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = (u64, Task)> + '_ {
        self.tasks.iter().map(|scheduled| (scheduled.due_ms, scheduled.task))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
