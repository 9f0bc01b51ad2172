//! # Task Management System
//!
//! This module provides cooperative, idle-time scheduling for deferred work.
//!
//! ## Architecture Overview
//!
//! - `IdleScheduler`: the seam a host implements to plug in its own frame loop
//! - `TaskManager`: the bundled scheduler, a single-threaded deadline queue
//! - `Task` / `TaskResult`: the work items, see [`task`]
//!
//! ## Scheduling Semantics
//!
//! Each task is submitted with a timeout. The host calls
//! [`IdleScheduler::run`] once per frame with the amount of idle time it can
//! spare. Tasks run in submission order while idle time remains; once the
//! budget is spent, only tasks whose deadline has already passed still run.
//! This is best effort before the deadline and forced after it. A host that
//! never calls `run` defers work indefinitely.
//!
//! ## Example Usage
//! ```rust
//! use std::time::Duration;
//! use voxel_world::task_management::{IdleScheduler, TaskManager};
//!
//! let mut scheduler = TaskManager::new();
//! // scheduler.schedule(Box::new(my_task), Duration::from_millis(1000));
//!
//! // In the host frame loop:
//! let results = scheduler.run(Duration::from_millis(4));
//! assert!(results.is_empty());
//! ```

pub mod task;

use std::collections::VecDeque;
use std::time::Duration;

use log::debug;
use task::{Task, TaskResult};
use web_time::Instant;

/// The scheduling collaborator: "run this task when idle, but no later than T".
pub trait IdleScheduler {
    /// Queues `task` to run during idle time, and no later than `timeout`
    /// after this call.
    fn schedule(&mut self, task: Box<dyn Task + Send>, timeout: Duration);

    /// Runs queued work.
    ///
    /// # Arguments
    /// * `idle_budget` - How long the host can spare right now. Overdue tasks
    ///   run even when the budget is zero.
    ///
    /// # Returns
    /// The results of every task that ran, in the order they ran.
    fn run(&mut self, idle_budget: Duration) -> Vec<Box<dyn TaskResult + Send>>;

    /// Number of tasks waiting to run.
    fn pending(&self) -> usize;
}

/// A task waiting in the queue together with its hard deadline.
struct ScheduledTask {
    task: Box<dyn Task + Send>,
    deadline: Instant,
}

/// The default [`IdleScheduler`]: a FIFO queue drained on the caller's thread.
///
/// # Implementation Notes
/// - Not thread-safe; lives on the same execution context as the world
/// - Tasks are never dropped without running
#[derive(Default)]
pub struct TaskManager {
    queued_tasks: VecDeque<ScheduledTask>,
}

impl TaskManager {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every queued task regardless of deadlines.
    pub fn run_all(&mut self) -> Vec<Box<dyn TaskResult + Send>> {
        self.queued_tasks
            .drain(..)
            .map(|scheduled| scheduled.task.process())
            .collect()
    }
}

impl IdleScheduler for TaskManager {
    fn schedule(&mut self, task: Box<dyn Task + Send>, timeout: Duration) {
        let now = Instant::now();
        // An unrepresentable deadline means "whenever idle".
        let deadline = now.checked_add(timeout).unwrap_or(now + Duration::from_secs(86_400 * 365));
        self.queued_tasks.push_back(ScheduledTask { task, deadline });
    }

    fn run(&mut self, idle_budget: Duration) -> Vec<Box<dyn TaskResult + Send>> {
        if self.queued_tasks.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let idle_until = start.checked_add(idle_budget);
        let mut results = Vec::new();
        let mut waiting = VecDeque::with_capacity(self.queued_tasks.len());

        while let Some(scheduled) = self.queued_tasks.pop_front() {
            let now = Instant::now();
            let idle = idle_until.map_or(true, |until| now < until);
            if idle || now >= scheduled.deadline {
                results.push(scheduled.task.process());
            } else {
                waiting.push_back(scheduled);
            }
        }

        self.queued_tasks = waiting;
        debug!(
            "Ran {} tasks in {:?}, {} still queued",
            results.len(),
            start.elapsed(),
            self.queued_tasks.len()
        );
        results
    }

    fn pending(&self) -> usize {
        self.queued_tasks.len()
    }
}
