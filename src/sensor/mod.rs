//! Sensor-to-physical-unit conversions.
//!
//! The monitor reads four analog channels through two 10-bit converters: an
//! external SPI ADC referenced at the digital rail, and the SoC's internal
//! ADC with its 1.1 V LDO reference. Everything in this module is pure
//! arithmetic over those raw codes plus an explicit [`Calibration`] table,
//! with no hardware access and no shared state.

pub mod calibration;
pub mod metrics;
pub mod reading;

pub use calibration::{AdcSource, Calibration, Divider};
pub use metrics::{AdcSample, SensorReader};
pub use reading::{SENSOR_DESCRIPTIONS, SensorReading};
