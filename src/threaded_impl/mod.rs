//! Threaded implementation - one OS thread per pipeline task

pub mod average_thread;
pub mod pipeline;
pub mod reporter_thread;
pub mod scheduler;
pub mod sensor_thread;

pub use average_thread::{AverageTask, MovingAverageTask, SimpleAverageTask};
pub use pipeline::{Pipeline, PipelineHandle, PipelineSummary};
pub use reporter_thread::ReporterTask;
pub use scheduler::{spawn_task, Delay, TaskHandle, TaskSpec, ThreadDelay, TickRate};
pub use sensor_thread::{SampleOutcome, SamplerTask};
