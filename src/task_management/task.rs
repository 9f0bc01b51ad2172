//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which lets expensive work such as chunk generation run in idle time instead
//! of inline with the call that requested it.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be deferred
//! - `TaskResult`: Represents the result of a completed task
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and handed to an [`IdleScheduler`](super::IdleScheduler)
//! 2. The task's `process()` method runs when the host is idle or its deadline passes
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is applied to the world
//! 5. The result can spawn follow-up tasks
//!
//! Tasks never borrow the world while processing. Everything they need is
//! captured when they are created, which is what allows `process()` to run
//! detached from the caller.

use crate::voxels::world::World;

/// A trait representing a unit of deferred work.
///
/// Tasks should own all the data they need. They are `Send` so a host is free
/// to run `process()` on another thread, even though the bundled scheduler
/// runs everything on the calling thread.
pub trait Task: Send {
    /// Performs the work and returns a result to be applied to the world.
    ///
    /// There is no cancellation: once started, a task runs to completion.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// A trait representing the result of processing a `Task`.
///
/// Results are applied one at a time on the world's own execution context.
pub trait TaskResult: Send {
    /// Applies the result to `world`.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (can be empty).
    fn handle_result(self: Box<Self>, world: &mut World) -> Vec<Box<dyn Task + Send>>;
}
