use std::time::{Duration, Instant};

use crate::benchmark::metrics::PipelineMetrics;
use crate::error::SensorError;
use crate::ipc::channels::SamplerPorts;
use crate::ipc::message_buffer::SendOutcome;
use crate::sensor::{AdcCalibration, Reading, TemperatureSource};
use crate::threaded_impl::scheduler::Delay;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// A fresh reading went out; outcomes are (simple, moving, report).
    Published(Reading, [SendOutcome; 3]),
    /// The sensor failed and the last good reading went out instead.
    Substituted(Reading, [SendOutcome; 3]),
    /// The sensor failed before any good reading existed.
    Skipped,
    /// The sensor has nothing more to give.
    Exhausted,
}

/// Periodic producer: delay, read, convert, fan out to three channels.
pub struct SamplerTask<S, D> {
    source: S,
    delay: D,
    ports: SamplerPorts,
    calibration: AdcCalibration,
    period: Duration,
    max_cycles: Option<u64>,
    last_good: Option<Reading>,
    cycles: u64,
    metrics: PipelineMetrics,
}

impl<S: TemperatureSource, D: Delay> SamplerTask<S, D> {
    pub fn new(
        source: S,
        delay: D,
        ports: SamplerPorts,
        period: Duration,
        metrics: PipelineMetrics,
    ) -> Self {
        Self {
            source,
            delay,
            ports,
            calibration: AdcCalibration::ONBOARD,
            period,
            max_cycles: None,
            last_good: None,
            cycles: 0,
            metrics,
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// One sampling cycle without the leading delay.
    pub fn step(&mut self) -> SampleOutcome {
        let start = Instant::now();
        let read = self
            .source
            .read_raw()
            .and_then(|raw| self.calibration.checked_to_celsius(raw));
        if matches!(read, Err(SensorError::Exhausted)) {
            return SampleOutcome::Exhausted;
        }
        self.cycles += 1;

        let reading = match read {
            Ok(temp) => {
                self.last_good = Some(temp);
                temp
            }
            Err(e) => {
                self.metrics.record_sensor_failure(self.last_good.is_some());
                match self.last_good {
                    Some(temp) => {
                        tracing::warn!(
                            cycle = self.cycles,
                            error = %e,
                            last = temp,
                            "sensor read failed, reusing last reading"
                        );
                        let sent = self.publish(temp);
                        return SampleOutcome::Substituted(temp, sent);
                    }
                    None => {
                        tracing::warn!(
                            cycle = self.cycles,
                            error = %e,
                            "sensor read failed, cycle skipped"
                        );
                        return SampleOutcome::Skipped;
                    }
                }
            }
        };

        let sent = self.publish(reading);
        self.metrics.record_sample(start.elapsed());
        SampleOutcome::Published(reading, sent)
    }

    // Each send stands alone: a drop on one channel never holds up the others.
    fn publish(&self, reading: Reading) -> [SendOutcome; 3] {
        [
            self.ports.to_simple.send(reading),
            self.ports.to_moving.send(reading),
            self.ports.to_report.send(reading),
        ]
    }

    /// Runs until the cycle limit is reached or the sensor is exhausted.
    /// Returning drops the publishers, which closes every downstream channel.
    pub fn run(mut self) -> u64 {
        let mut last_wake: Option<Instant> = None;
        loop {
            if self.max_cycles.is_some_and(|max| self.cycles >= max) {
                break;
            }

            self.delay.delay(self.period);
            let now = Instant::now();
            if let Some(prev) = last_wake {
                self.metrics.record_period(now - prev);
            }
            last_wake = Some(now);

            if self.step() == SampleOutcome::Exhausted {
                tracing::info!(cycles = self.cycles, "sensor exhausted");
                break;
            }
        }
        tracing::info!(cycles = self.cycles, "sampler stopped");
        self.cycles
    }
}
