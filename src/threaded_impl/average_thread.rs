use crate::ipc::channels::AverageTaskPorts;
use crate::ipc::message_buffer::SendOutcome;
use crate::sensor::{MovingAverage, Reading, RunningAverage, SimpleAverage};

/// Consumer/producer task: one reading in, one updated average out.
/// The averaging state lives here and nowhere else.
pub struct AverageTask<A> {
    name: &'static str,
    state: A,
    ports: AverageTaskPorts,
    published: u64,
}

pub type SimpleAverageTask = AverageTask<SimpleAverage>;
pub type MovingAverageTask = AverageTask<MovingAverage>;

impl SimpleAverageTask {
    pub fn simple(ports: AverageTaskPorts) -> Self {
        AverageTask::new("simple-average", SimpleAverage::new(), ports)
    }
}

impl MovingAverageTask {
    pub fn moving(window_size: usize, ports: AverageTaskPorts) -> Self {
        AverageTask::new("moving-average", MovingAverage::new(window_size), ports)
    }
}

impl<A: RunningAverage> AverageTask<A> {
    pub fn new(name: &'static str, state: A, ports: AverageTaskPorts) -> Self {
        Self {
            name,
            state,
            ports,
            published: 0,
        }
    }

    pub fn state(&self) -> &A {
        &self.state
    }

    /// Block for one reading and publish the new average. `None` once the
    /// input channel is closed and drained.
    pub fn step(&mut self) -> Option<(Reading, SendOutcome)> {
        let reading = self.ports.input.recv_blocking()?;
        let result = self.state.push(reading);
        let sent = self.ports.output.send(result);
        if sent.is_accepted() {
            self.published += 1;
        }
        Some((result, sent))
    }

    pub fn run(mut self) -> u64 {
        while self.step().is_some() {}
        tracing::info!(task = self.name, published = self.published, "input closed");
        self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::message_buffer::{ChannelId, MessageBuffer, Publisher, Subscriber};

    fn ports() -> (Publisher<Reading>, AverageTaskPorts, Subscriber<Reading>) {
        let (in_tx, in_rx) = MessageBuffer::with_slots(ChannelId::RawToMoving, 16)
            .unwrap()
            .split();
        let (out_tx, out_rx) = MessageBuffer::with_slots(ChannelId::MovingResult, 16)
            .unwrap()
            .split();
        (in_tx, AverageTaskPorts { input: in_rx, output: out_tx }, out_rx)
    }

    #[test]
    fn moving_task_publishes_window_mean() {
        let (tx, ports, out) = ports();
        for x in [10.0, 20.0, 30.0] {
            tx.send(x);
        }
        drop(tx);

        assert_eq!(MovingAverageTask::moving(10, ports).run(), 3);
        let results: Vec<Reading> = std::iter::from_fn(|| out.recv_blocking()).collect();
        assert_eq!(results, vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn simple_task_step_reports_drop_on_full_output() {
        let (in_tx, in_rx) = MessageBuffer::with_slots(ChannelId::RawToSimple, 4)
            .unwrap()
            .split();
        let (out_tx, _out_rx) = MessageBuffer::with_slots(ChannelId::SimpleResult, 1)
            .unwrap()
            .split();
        let mut task = SimpleAverageTask::simple(AverageTaskPorts { input: in_rx, output: out_tx });

        in_tx.send(2.0);
        in_tx.send(4.0);
        assert_eq!(task.step(), Some((2.0, SendOutcome::Accepted)));
        assert_eq!(task.step(), Some((3.0, SendOutcome::Dropped)));
        // the state advanced even though the result was dropped
        assert_eq!(task.state().count(), 2);
    }
}
