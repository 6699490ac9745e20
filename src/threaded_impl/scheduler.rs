//! Task creation and timing primitives.
//!
//! Each pipeline task is a named OS thread. The priority in a [`TaskSpec`] is
//! the fixed priority the task would run at under an RTOS; the host scheduler
//! does not honour it, so it is carried for logging only.

use std::thread;
use std::time::Duration;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static str,
    pub stack_size: usize,
    pub priority: u8,
}

pub struct TaskHandle {
    spec: TaskSpec,
    handle: thread::JoinHandle<()>,
}

impl TaskHandle {
    pub fn spec(&self) -> TaskSpec {
        self.spec
    }

    pub fn join(self) -> Result<(), PipelineError> {
        self.handle
            .join()
            .map_err(|_| PipelineError::TaskPanicked(self.spec.name))
    }
}

pub fn spawn_task<F>(spec: TaskSpec, body: F) -> Result<TaskHandle, PipelineError>
where
    F: FnOnce() + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(spec.name.to_string())
        .stack_size(spec.stack_size)
        .spawn(move || {
            tracing::debug!(task = spec.name, priority = spec.priority, "task running");
            body();
            tracing::debug!(task = spec.name, "task exited");
        })
        .map_err(|source| PipelineError::TaskSpawn {
            name: spec.name,
            source,
        })?;

    tracing::info!(
        task = spec.name,
        priority = spec.priority,
        stack_size = spec.stack_size,
        "task created"
    );
    Ok(TaskHandle { spec, handle })
}

/// Suspends the calling task for roughly the given duration.
pub trait Delay: Send {
    fn delay(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay(&mut self, duration: Duration) {
        if duration.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(duration);
        }
    }
}

/// Scheduler tick rate. Delays are whole ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRate {
    hz: u32,
}

impl TickRate {
    pub const DEFAULT: TickRate = TickRate { hz: 1000 };

    /// A zero rate is treated as 1 Hz.
    pub fn new(hz: u32) -> Self {
        Self { hz: hz.max(1) }
    }

    pub fn hz(&self) -> u32 {
        self.hz
    }

    /// Whole ticks in `duration`, rounded down.
    pub fn ticks(&self, duration: Duration) -> u64 {
        (duration.as_nanos() * self.hz as u128 / 1_000_000_000) as u64
    }

    pub fn quantize(&self, duration: Duration) -> Duration {
        let ticks = self.ticks(duration) as u128;
        Duration::from_nanos((ticks * 1_000_000_000 / self.hz as u128) as u64)
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}
