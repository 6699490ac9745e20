//! Error types for the pipeline.
//!
//! Only startup can fail hard. Once the tasks are running, a full channel is
//! a dropped sample, not an error, and sensor failures are absorbed by the
//! sampler.

use thiserror::Error;

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn task '{name}': {source}")]
    TaskSpawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("task '{0}' panicked")]
    TaskPanicked(&'static str),

    #[error("channel capacity of {capacity_bytes} bytes cannot hold one {record_bytes}-byte record")]
    ChannelTooSmall {
        capacity_bytes: usize,
        record_bytes: usize,
    },

    #[error("channel must hold at least one record")]
    ZeroCapacity,

    #[error("metrics histogram creation failed: {0}")]
    Metrics(#[from] hdrhistogram::CreationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("sensor read failed")]
    ReadFailed,

    #[error("raw code {code} exceeds the {max} maximum of the converter")]
    OutOfRange { code: u16, max: u16 },

    #[error("sensor has no more samples")]
    Exhausted,
}
