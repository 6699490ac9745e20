use crate::error::PipelineError;
use crate::ipc::message_buffer::{ChannelId, ChannelStats, MessageBuffer, Publisher, Subscriber};
use crate::sensor::Reading;

// Sampler -> {simple, moving, report}
pub struct SamplerPorts {
    pub to_simple: Publisher<Reading>,
    pub to_moving: Publisher<Reading>,
    pub to_report: Publisher<Reading>,
}

// Raw readings in, one averaged value out
pub struct AverageTaskPorts {
    pub input: Subscriber<Reading>,
    pub output: Publisher<Reading>,
}

pub struct ReporterPorts {
    pub raw: Subscriber<Reading>,
    pub simple: Subscriber<Reading>,
    pub moving: Subscriber<Reading>,
}

/// All five pipeline channels, already split into the endpoint bundle each
/// task owns.
pub struct PipelineChannels {
    pub sampler: SamplerPorts,
    pub simple_average: AverageTaskPorts,
    pub moving_average: AverageTaskPorts,
    pub reporter: ReporterPorts,
    pub stats: Vec<ChannelStats>,
}

impl PipelineChannels {
    pub fn new(capacity_bytes: usize) -> Result<Self, PipelineError> {
        let mut stats = Vec::with_capacity(ChannelId::ALL.len());
        type Endpoints = (Publisher<Reading>, Subscriber<Reading>);
        let mut open = |id: ChannelId| -> Result<Endpoints, PipelineError> {
            let buf = MessageBuffer::<Reading>::from_bytes(id, capacity_bytes)?;
            stats.push(buf.stats());
            Ok(buf.split())
        };

        let (raw_simple_tx, raw_simple_rx) = open(ChannelId::RawToSimple)?;
        let (raw_moving_tx, raw_moving_rx) = open(ChannelId::RawToMoving)?;
        let (raw_report_tx, raw_report_rx) = open(ChannelId::RawToReport)?;
        let (simple_tx, simple_rx) = open(ChannelId::SimpleResult)?;
        let (moving_tx, moving_rx) = open(ChannelId::MovingResult)?;

        Ok(Self {
            sampler: SamplerPorts {
                to_simple: raw_simple_tx,
                to_moving: raw_moving_tx,
                to_report: raw_report_tx,
            },
            simple_average: AverageTaskPorts {
                input: raw_simple_rx,
                output: simple_tx,
            },
            moving_average: AverageTaskPorts {
                input: raw_moving_rx,
                output: moving_tx,
            },
            reporter: ReporterPorts {
                raw: raw_report_rx,
                simple: simple_rx,
                moving: moving_rx,
            },
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wires_every_channel_once() {
        let channels = PipelineChannels::new(60).unwrap();
        let ids: Vec<ChannelId> = channels.stats.iter().map(|s| s.id()).collect();
        assert_eq!(ids, ChannelId::ALL.to_vec());
        assert_eq!(channels.sampler.to_simple.id(), channels.simple_average.input.id());
        assert_eq!(channels.moving_average.output.id(), channels.reporter.moving.id());
        assert_eq!(channels.reporter.raw.capacity(), 7);
    }

    #[test]
    fn sampler_fan_out_reaches_each_consumer() {
        let channels = PipelineChannels::new(60).unwrap();
        channels.sampler.to_simple.send(21.5);
        channels.sampler.to_moving.send(21.5);
        channels.sampler.to_report.send(21.5);
        assert_eq!(channels.simple_average.input.recv_blocking(), Some(21.5));
        assert_eq!(channels.moving_average.input.recv_blocking(), Some(21.5));
        assert_eq!(channels.reporter.raw.recv_blocking(), Some(21.5));
    }
}
