//! IPC module - bounded message buffers connecting the pipeline tasks

pub mod channels;
pub mod message_buffer;

pub use channels::{AverageTaskPorts, PipelineChannels, ReporterPorts, SamplerPorts};
pub use message_buffer::{
    ChannelId, ChannelStats, MessageBuffer, Publisher, Received, SendOutcome, Subscriber, Wait,
};
