//! Progressive Disclosure Scheduler
//!
//! Decides when each independent scene subtree becomes eligible to mount,
//! so expensive subtree construction staggers across frames instead of
//! landing on the first one.
//!
//! The scheduler owns every pending wait: the frame loop advances it with
//! [`tick`], and activation is a latched one-way transition observed via
//! [`is_active`]. Cancelling a task removes it outright, so no activation
//! can fire against a torn-down owner.
//!
//! [`tick`]: DisclosureScheduler::tick
//! [`is_active`]: DisclosureScheduler::is_active

use bevy_ecs::prelude::Resource;
use tracing::debug;

/// Handle to one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

/// Activation state of a task. Pending to Active is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Active,
}

#[derive(Debug)]
struct DisclosureTask {
    tier: u8,
    state: TaskState,
    /// Scheduler time at which the task activates, in milliseconds.
    ready_at_ms: f64,
}

/// Stages activation of scene subtrees by priority tier and delay.
#[derive(Resource, Debug)]
pub struct DisclosureScheduler {
    base_step_ms: u64,
    elapsed_ms: f64,
    tasks: Vec<Option<DisclosureTask>>,
}

impl DisclosureScheduler {
    pub fn new(base_step_ms: u64) -> Self {
        Self {
            base_step_ms,
            elapsed_ms: 0.0,
            tasks: Vec::new(),
        }
    }

    /// Schedule a subtree at `tier` with an optional extra delay.
    ///
    /// Tier 0 activates immediately and synchronously. Higher tiers
    /// activate once `max(extra_delay_ms, tier * base_step_ms)` of
    /// scheduler time has passed from this call.
    pub fn schedule(&mut self, tier: u8, extra_delay_ms: u64) -> TaskId {
        let state = if tier == 0 {
            TaskState::Active
        } else {
            TaskState::Pending
        };
        let delay_ms = extra_delay_ms.max(u64::from(tier) * self.base_step_ms);
        let task = DisclosureTask {
            tier,
            state,
            ready_at_ms: self.elapsed_ms + delay_ms as f64,
        };
        debug!(tier, delay_ms, "scheduled disclosure task");
        self.tasks.push(Some(task));
        TaskId(self.tasks.len() - 1)
    }

    /// Advance scheduler time and latch any task whose delay has elapsed.
    pub fn tick(&mut self, dt_secs: f64) {
        self.elapsed_ms += dt_secs * 1000.0;
        for slot in self.tasks.iter_mut().flatten() {
            if slot.state == TaskState::Pending && self.elapsed_ms >= slot.ready_at_ms {
                slot.state = TaskState::Active;
                debug!(tier = slot.tier, "disclosure task activated");
            }
        }
    }

    /// Whether the task has activated. Cancelled or unknown tasks are
    /// never active.
    pub fn is_active(&self, id: TaskId) -> bool {
        self.state(id) == Some(TaskState::Active)
    }

    pub fn state(&self, id: TaskId) -> Option<TaskState> {
        self.tasks.get(id.0).and_then(|t| t.as_ref()).map(|t| t.state)
    }

    /// Cancel a task on owner teardown. Removing it outright guarantees no
    /// later activation can address the departed owner.
    pub fn cancel(&mut self, id: TaskId) {
        if let Some(slot) = self.tasks.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Number of live (not cancelled) tasks.
    pub fn live_tasks(&self) -> usize {
        self.tasks.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_zero_is_active_immediately() {
        let mut scheduler = DisclosureScheduler::new(180);
        let task = scheduler.schedule(0, 0);
        assert!(scheduler.is_active(task));
    }

    #[test]
    fn test_higher_tiers_start_pending() {
        let mut scheduler = DisclosureScheduler::new(180);
        let task = scheduler.schedule(2, 0);
        assert_eq!(scheduler.state(task), Some(TaskState::Pending));
    }

    #[test]
    fn test_tier_two_activates_after_two_steps() {
        let mut scheduler = DisclosureScheduler::new(180);
        let task = scheduler.schedule(2, 0);
        scheduler.tick(0.359); // 359 ms, just shy of 2 * 180
        assert!(!scheduler.is_active(task));
        scheduler.tick(0.002);
        assert!(scheduler.is_active(task));
    }

    #[test]
    fn test_extra_delay_wins_when_larger() {
        let mut scheduler = DisclosureScheduler::new(100);
        let task = scheduler.schedule(1, 500);
        scheduler.tick(0.2);
        assert!(!scheduler.is_active(task), "tier delay alone must not activate");
        scheduler.tick(0.31);
        assert!(scheduler.is_active(task));
    }

    #[test]
    fn test_activation_is_latched() {
        let mut scheduler = DisclosureScheduler::new(50);
        let task = scheduler.schedule(1, 0);
        scheduler.tick(0.1);
        assert!(scheduler.is_active(task));
        // Further ticks, including zero-length ones, never revert it.
        scheduler.tick(0.0);
        scheduler.tick(10.0);
        assert!(scheduler.is_active(task));
    }

    #[test]
    fn test_delay_counts_from_schedule_time() {
        let mut scheduler = DisclosureScheduler::new(100);
        scheduler.tick(5.0); // scene has been up for a while
        let task = scheduler.schedule(1, 0);
        assert!(!scheduler.is_active(task), "past time must not pre-satisfy the delay");
        scheduler.tick(0.11);
        assert!(scheduler.is_active(task));
    }

    #[test]
    fn test_cancelled_task_never_activates() {
        let mut scheduler = DisclosureScheduler::new(50);
        let task = scheduler.schedule(1, 0);
        scheduler.cancel(task);
        scheduler.tick(1.0);
        assert!(!scheduler.is_active(task));
        assert_eq!(scheduler.state(task), None);
        assert_eq!(scheduler.live_tasks(), 0);
    }

    #[test]
    fn test_tasks_are_independent() {
        let mut scheduler = DisclosureScheduler::new(100);
        let t0 = scheduler.schedule(0, 0);
        let t1 = scheduler.schedule(1, 0);
        let t3 = scheduler.schedule(3, 0);
        scheduler.tick(0.15);
        assert!(scheduler.is_active(t0));
        assert!(scheduler.is_active(t1));
        assert!(!scheduler.is_active(t3));
        scheduler.tick(0.15);
        assert!(scheduler.is_active(t3));
    }
}
