//! Sensor module - temperature source, ADC calibration and averaging filters

pub mod calibration;
pub mod filter;
pub mod generator;

pub use calibration::AdcCalibration;
pub use filter::{MovingAverage, RunningAverage, SimpleAverage, DEFAULT_WINDOW_SIZE};
pub use generator::{ScriptedSensor, SimulatedSensor};

use crate::error::SensorError;

/// A temperature in degrees Celsius.
pub type Reading = f32;

/// The on-chip sensor as the sampler sees it: one raw converter code per call.
pub trait TemperatureSource: Send {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}
