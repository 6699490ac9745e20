// Pipeline configuration loaded from TOML, with defaults for every field
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::ipc::message_buffer::record_cost;
use crate::sensor::Reading;

pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline_config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sample_period_ms: u64,
    pub tick_rate_hz: u32,
    pub window_size: usize,
    pub channel_capacity_bytes: usize,
    pub stack_size: usize,
    pub max_cycles: Option<u64>,
    pub priorities: TaskPriorities,
    pub sensor: SimulatedSensorConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TaskPriorities {
    pub sampler: u8,
    pub simple_average: u8,
    pub moving_average: u8,
    pub reporter: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatedSensorConfig {
    pub base_temp_c: f32,
    pub noise_c: f32,
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: 1000,
            tick_rate_hz: 1000,
            window_size: 10,
            channel_capacity_bytes: 60,
            stack_size: 64 * 1024,
            max_cycles: None,
            priorities: TaskPriorities::default(),
            sensor: SimulatedSensorConfig::default(),
        }
    }
}

impl Default for TaskPriorities {
    fn default() -> Self {
        Self {
            sampler: 8,
            simple_average: 7,
            moving_average: 5,
            reporter: 1,
        }
    }
}

impl Default for SimulatedSensorConfig {
    fn default() -> Self {
        Self {
            base_temp_c: 27.0,
            noise_c: 1.5,
            seed: 42,
        }
    }
}

impl PipelineConfig {
    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(self.sample_period_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::Invalid {
                field: "window_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_rate_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        let cost = record_cost::<Reading>();
        if self.channel_capacity_bytes < cost {
            return Err(ConfigError::Invalid {
                field: "channel_capacity_bytes",
                reason: format!("must fit at least one {cost}-byte record"),
            });
        }
        if !self.sensor.noise_c.is_finite() || self.sensor.noise_c < 0.0 {
            return Err(ConfigError::Invalid {
                field: "sensor.noise_c",
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

/// Load configuration from `path`. A missing file means defaults; a file that
/// exists but does not parse is an error.
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(PipelineConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };
    parse_config(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn parse_config(text: &str) -> Result<PipelineConfig, toml::de::Error> {
    toml::from_str::<PipelineConfig>(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_design() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.window_size, 10);
        assert_eq!(cfg.channel_capacity_bytes, 60);
        assert_eq!(cfg.priorities.sampler, 8);
        assert_eq!(cfg.priorities.reporter, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = parse_config("sample_period_ms = 50\n[sensor]\nseed = 7\n").unwrap();
        assert_eq!(cfg.sample_period_ms, 50);
        assert_eq!(cfg.sensor.seed, 7);
        assert_eq!(cfg.sensor.base_temp_c, 27.0);
        assert_eq!(cfg.window_size, 10);
    }

    #[test]
    fn rejects_zero_window() {
        let cfg = PipelineConfig {
            window_size: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "window_size", .. })
        ));
    }

    #[test]
    fn rejects_channel_smaller_than_one_record() {
        let cfg = PipelineConfig {
            channel_capacity_bytes: 7,
            ..PipelineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_config("does/not/exist.toml").unwrap();
        assert_eq!(cfg.sample_period_ms, 1000);
    }
}
