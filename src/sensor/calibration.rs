//! Raw ADC code to temperature conversion.
//!
//! The on-chip sensor is a diode whose voltage falls linearly with
//! temperature: `T = 27 - (V - 0.706) / 0.001721`, where `V` is the code
//! scaled by the converter's reference voltage and resolution.

use crate::error::SensorError;
use crate::sensor::Reading;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcCalibration {
    /// Converter reference voltage (V)
    pub vref: f32,
    /// Converter resolution in bits
    pub resolution_bits: u8,
    /// Sensor voltage at 27 °C (V)
    pub v_at_27c: f32,
    /// Voltage change per °C (V/°C, positive; voltage falls as temperature rises)
    pub slope: f32,
}

impl AdcCalibration {
    pub const ONBOARD: Self = Self {
        vref: 3.3,
        resolution_bits: 12,
        v_at_27c: 0.706,
        slope: 0.001721,
    };

    pub fn max_code(&self) -> u16 {
        ((1u32 << self.resolution_bits) - 1) as u16
    }

    fn volts_per_code(&self) -> f32 {
        self.vref / (1u32 << self.resolution_bits) as f32
    }

    pub fn to_celsius(&self, raw: u16) -> Reading {
        let volts = raw as f32 * self.volts_per_code();
        27.0 - (volts - self.v_at_27c) / self.slope
    }

    /// Convert after checking the code fits the converter's range.
    pub fn checked_to_celsius(&self, raw: u16) -> Result<Reading, SensorError> {
        let max = self.max_code();
        if raw > max {
            return Err(SensorError::OutOfRange { code: raw, max });
        }
        Ok(self.to_celsius(raw))
    }

    /// Nearest raw code for a temperature, clamped to the converter's range.
    pub fn raw_for_celsius(&self, temp_c: f32) -> u16 {
        let volts = self.v_at_27c - (temp_c - 27.0) * self.slope;
        let code = (volts / self.volts_per_code()).round();
        code.clamp(0.0, self.max_code() as f32) as u16
    }
}

impl Default for AdcCalibration {
    fn default() -> Self {
        Self::ONBOARD
    }
}
