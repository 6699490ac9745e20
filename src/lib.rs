pub mod benchmark;
pub mod config;
pub mod error;
pub mod ipc;
pub mod report;
pub mod sensor;
pub mod threaded_impl;

pub use config::{load_config, PipelineConfig};
pub use error::{ConfigError, PipelineError, SensorError};
pub use ipc::{ChannelId, MessageBuffer, PipelineChannels, Received, SendOutcome, Wait};
pub use report::{MemorySink, Report, ReportSink, StdoutSink};
pub use sensor::{
    AdcCalibration, MovingAverage, Reading, ScriptedSensor, SimpleAverage, SimulatedSensor,
    TemperatureSource,
};
pub use threaded_impl::{Pipeline, PipelineHandle, PipelineSummary};
