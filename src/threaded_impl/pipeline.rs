//! Startup: allocate every channel, create every task, hand each task only
//! the endpoints it owns.
//!
//! Consumers are created before the sampler. If any creation fails, the
//! endpoints of the tasks not yet created are dropped, the tasks already
//! running see their inputs close and exit, and `launch` returns the error.
//! There is no partially started pipeline.

use crate::benchmark::metrics::{MetricsReport, PipelineMetrics};
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::ipc::channels::PipelineChannels;
use crate::report::ReportSink;
use crate::sensor::TemperatureSource;
use crate::threaded_impl::average_thread::{MovingAverageTask, SimpleAverageTask};
use crate::threaded_impl::reporter_thread::ReporterTask;
use crate::threaded_impl::scheduler::{spawn_task, TaskHandle, TaskSpec, ThreadDelay, TickRate};
use crate::threaded_impl::sensor_thread::SamplerTask;

pub struct Pipeline;

impl Pipeline {
    pub fn launch<S, K>(
        config: &PipelineConfig,
        source: S,
        sink: K,
    ) -> PipelineResult<PipelineHandle>
    where
        S: TemperatureSource + 'static,
        K: ReportSink + 'static,
    {
        config.validate()?;

        let metrics = PipelineMetrics::new()?;
        let channels = PipelineChannels::new(config.channel_capacity_bytes)?;
        metrics.track_channels(&channels.stats);

        let period = TickRate::new(config.tick_rate_hz).quantize(config.sample_period());
        let spec = |name: &'static str, priority: u8| TaskSpec {
            name,
            stack_size: config.stack_size,
            priority,
        };
        let prio = config.priorities;

        let PipelineChannels {
            sampler,
            simple_average,
            moving_average,
            reporter,
            ..
        } = channels;

        let mut tasks = Vec::with_capacity(4);

        let reporter_task = ReporterTask::new(reporter, sink, metrics.clone());
        tasks.push(spawn_task(spec("reporter", prio.reporter), move || {
            reporter_task.run();
        })?);

        let moving_task = MovingAverageTask::moving(config.window_size, moving_average);
        tasks.push(spawn_task(spec("moving-average", prio.moving_average), move || {
            moving_task.run();
        })?);

        let simple_task = SimpleAverageTask::simple(simple_average);
        tasks.push(spawn_task(spec("simple-average", prio.simple_average), move || {
            simple_task.run();
        })?);

        let sampler_task = SamplerTask::new(source, ThreadDelay, sampler, period, metrics.clone())
            .with_max_cycles(config.max_cycles);
        tasks.push(spawn_task(spec("sampler", prio.sampler), move || {
            sampler_task.run();
        })?);

        tracing::info!(
            period_ms = period.as_millis() as u64,
            window = config.window_size,
            channel_bytes = config.channel_capacity_bytes,
            "pipeline started"
        );

        Ok(PipelineHandle { tasks, metrics })
    }
}

pub struct PipelineHandle {
    tasks: Vec<TaskHandle>,
    metrics: PipelineMetrics,
}

impl PipelineHandle {
    pub fn task_specs(&self) -> Vec<TaskSpec> {
        self.tasks.iter().map(|t| t.spec()).collect()
    }

    /// Wait for every task. Without a cycle limit this never returns.
    pub fn join(self) -> PipelineResult<PipelineSummary> {
        let mut first_err = None;
        for task in self.tasks {
            if let Err(e) = task.join() {
                tracing::error!(error = %e, "task failed");
                first_err.get_or_insert(e);
            }
        }
        if let Some(e) = first_err {
            return Err(e);
        }
        Ok(PipelineSummary {
            metrics: self.metrics.report(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub metrics: MetricsReport,
}
