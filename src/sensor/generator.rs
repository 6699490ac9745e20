use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use super::calibration::AdcCalibration;
use super::TemperatureSource;
use crate::config::SimulatedSensorConfig;
use crate::error::SensorError;

/// Stands in for the on-chip sensor when running on a host: noisy raw codes
/// around a base temperature, reproducible for a given seed.
pub struct SimulatedSensor {
    rng: StdRng,
    calibration: AdcCalibration,
    samples_taken: u64,
    pub base_temp_c: f32,
    pub noise_c: f32,
}

impl SimulatedSensor {
    pub fn new(seed: u64) -> Self {
        Self::from_config(&SimulatedSensorConfig {
            seed,
            ..SimulatedSensorConfig::default()
        })
    }

    pub fn from_config(cfg: &SimulatedSensorConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(cfg.seed),
            calibration: AdcCalibration::ONBOARD,
            samples_taken: 0,
            base_temp_c: cfg.base_temp_c,
            noise_c: cfg.noise_c,
        }
    }

    pub fn samples_taken(&self) -> u64 {
        self.samples_taken
    }

    pub fn inject_drift(&mut self, delta_c: f32) {
        self.base_temp_c += delta_c;
    }
}

impl TemperatureSource for SimulatedSensor {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.samples_taken += 1;
        let noise = if self.noise_c > 0.0 {
            self.rng.gen_range(-self.noise_c..self.noise_c)
        } else {
            0.0
        };
        Ok(self.calibration.raw_for_celsius(self.base_temp_c + noise))
    }
}

/// Replays a fixed sequence of raw codes and failures, then reports
/// `SensorError::Exhausted`.
pub struct ScriptedSensor {
    script: VecDeque<Result<u16, SensorError>>,
}

impl ScriptedSensor {
    pub fn new(script: impl IntoIterator<Item = Result<u16, SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn from_codes(codes: impl IntoIterator<Item = u16>) -> Self {
        Self::new(codes.into_iter().map(Ok))
    }

    /// Script the codes that read back as `temps` under the onboard calibration.
    pub fn from_celsius(temps: impl IntoIterator<Item = f32>) -> Self {
        let cal = AdcCalibration::ONBOARD;
        Self::from_codes(temps.into_iter().map(|t| cal.raw_for_celsius(t)))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TemperatureSource for ScriptedSensor {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.script.pop_front().unwrap_or(Err(SensorError::Exhausted))
    }
}
