use crate::benchmark::metrics::PipelineMetrics;
use crate::ipc::channels::ReporterPorts;
use crate::report::{Report, ReportSink};

/// Lowest-priority task: one raw reading, one simple average and one moving
/// average per cycle, always received in that order, then one line out.
///
/// The three channels are not synchronised with each other, so under
/// contention a report may pair values from adjacent sampling cycles.
pub struct ReporterTask<K> {
    ports: ReporterPorts,
    sink: K,
    sequence: u64,
    metrics: PipelineMetrics,
}

impl<K: ReportSink> ReporterTask<K> {
    pub fn new(ports: ReporterPorts, sink: K, metrics: PipelineMetrics) -> Self {
        Self {
            ports,
            sink,
            sequence: 0,
            metrics,
        }
    }

    /// `None` once any input is closed and drained.
    pub fn step(&mut self) -> Option<Report> {
        let raw = self.ports.raw.recv_blocking()?;
        let simple = self.ports.simple.recv_blocking()?;
        let moving = self.ports.moving.recv_blocking()?;

        self.sequence += 1;
        let report = Report {
            sequence: self.sequence,
            raw,
            simple,
            moving,
        };
        match self.sink.emit(&report) {
            Ok(()) => self.metrics.record_report(),
            Err(e) => {
                tracing::warn!(sequence = self.sequence, error = %e, "failed to write report");
            }
        }
        Some(report)
    }

    pub fn run(mut self) -> u64 {
        while self.step().is_some() {}
        tracing::info!(reports = self.sequence, "reporter stopped");
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::channels::PipelineChannels;
    use crate::report::MemorySink;
    use std::io;

    struct BrokenSink;

    impl ReportSink for BrokenSink {
        fn emit(&mut self, _report: &Report) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }
    }

    #[test]
    fn assembles_one_report_from_three_channels() {
        let channels = PipelineChannels::new(60).unwrap();
        let sink = MemorySink::new();
        let mut reporter = ReporterTask::new(
            channels.reporter,
            sink.clone(),
            PipelineMetrics::new().unwrap(),
        );

        channels.sampler.to_report.send(25.0);
        channels.simple_average.output.send(24.0);
        channels.moving_average.output.send(24.5);

        let report = reporter.step().unwrap();
        assert_eq!(
            report,
            Report { sequence: 1, raw: 25.0, simple: 24.0, moving: 24.5 }
        );
        assert_eq!(sink.reports(), vec![report]);
    }

    #[test]
    fn stops_when_an_input_closes() {
        let channels = PipelineChannels::new(60).unwrap();
        let reporter = ReporterTask::new(
            channels.reporter,
            MemorySink::new(),
            PipelineMetrics::new().unwrap(),
        );
        channels.sampler.to_report.send(25.0);
        drop(channels.simple_average);
        drop(channels.sampler);
        assert_eq!(reporter.run(), 0);
    }

    #[test]
    fn failed_write_is_not_counted_and_reporter_keeps_going() {
        let channels = PipelineChannels::new(60).unwrap();
        let metrics = PipelineMetrics::new().unwrap();
        let mut reporter = ReporterTask::new(channels.reporter, BrokenSink, metrics.clone());

        for x in [25.0, 26.0] {
            channels.sampler.to_report.send(x);
            channels.simple_average.output.send(x);
            channels.moving_average.output.send(x);
        }

        assert_eq!(reporter.step().map(|r| r.sequence), Some(1));
        assert_eq!(reporter.step().map(|r| r.sequence), Some(2));
        assert_eq!(metrics.report().reports, 0);
    }
}
