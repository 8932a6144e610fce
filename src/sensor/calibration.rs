//! Calibration constants for the sensing hardware.
//!
//! The defaults describe the shipped board: a WDYJ GM5539 photoresistor, a
//! Honeywell 192-103LET-A01 thermistor, an XCSOURCE TE215 moisture probe and
//! the battery divider, each behind its measured divider resistors. Every
//! value can be overridden from configuration, which is what makes the
//! conversions testable without hardware.

use serde::{Deserialize, Serialize};

/// Which converter took a sample. Decides the reference voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdcSource {
    /// The SoC's internal ADC (1.1 V LDO reference).
    Internal,
    /// The external SPI ADC (referenced from the digital output rail).
    External,
}

/// Shared ADC reference information.
///
/// Both converters are 10-bit; only their reference voltages differ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdcCalibration {
    /// Full-scale code count of either converter.
    ///
    /// Default: 1024
    #[serde(default = "defaults::resolution")]
    pub resolution: u32,

    /// Reference voltage of the external converter.
    ///
    /// Default: 2.84 V
    #[serde(default = "defaults::external_ref_volts")]
    pub external_ref_volts: f64,

    /// Reference voltage of the internal converter.
    ///
    /// Default: 1.1 V
    #[serde(default = "defaults::internal_ref_volts")]
    pub internal_ref_volts: f64,
}

impl AdcCalibration {
    /// Reference voltage for the converter that took the sample.
    #[must_use]
    pub const fn reference_volts(&self, source: AdcSource) -> f64 {
        match source {
            AdcSource::Internal => self.internal_ref_volts,
            AdcSource::External => self.external_ref_volts,
        }
    }
}

impl Default for AdcCalibration {
    fn default() -> Self {
        Self {
            resolution: defaults::resolution(),
            external_ref_volts: defaults::external_ref_volts(),
            internal_ref_volts: defaults::internal_ref_volts(),
        }
    }
}

/// A two-resistor voltage divider, values in ohms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Divider {
    pub r1: f64,
    pub r2: f64,
}

impl Divider {
    #[must_use]
    pub const fn new(r1: f64, r2: f64) -> Self {
        Self { r1, r2 }
    }
}

/// Photoresistor divider and best-fit line constants.
///
/// `m` and `b` come from a log-log fit of test measurements against a
/// reference lux meter; they are unique to the individual sensor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhotoresistorCalibration {
    /// Known divider resistor the photoresistor is measured against.
    ///
    /// Default: 9830 Ω
    #[serde(default = "defaults::photoresistor_r2")]
    pub divider_r2: f64,

    /// Power-law exponent of the fit.
    ///
    /// Default: −1.1116
    #[serde(default = "defaults::photoresistor_m")]
    pub m: f64,

    /// Power-of-ten intercept of the fit.
    ///
    /// Default: 7.3113
    #[serde(default = "defaults::photoresistor_b")]
    pub b: f64,
}

impl Default for PhotoresistorCalibration {
    fn default() -> Self {
        Self {
            divider_r2: defaults::photoresistor_r2(),
            m: defaults::photoresistor_m(),
            b: defaults::photoresistor_b(),
        }
    }
}

/// Thermistor divider and Beta-equation constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThermistorCalibration {
    /// Known divider resistor the thermistor is measured against.
    ///
    /// Default: 9930 Ω
    #[serde(default = "defaults::thermistor_r2")]
    pub divider_r2: f64,

    /// Material constant of the thermistor.
    ///
    /// Default: 3974
    #[serde(default = "defaults::thermistor_beta")]
    pub beta: f64,

    /// Rated resistance at the reference temperature.
    ///
    /// Default: 10 000 Ω
    #[serde(default = "defaults::thermistor_r0")]
    pub r0: f64,

    /// Reference temperature in Kelvin (room temperature).
    ///
    /// Default: 298.15 K
    #[serde(default = "defaults::thermistor_t0")]
    pub t0: f64,
}

impl Default for ThermistorCalibration {
    fn default() -> Self {
        Self {
            divider_r2: defaults::thermistor_r2(),
            beta: defaults::thermistor_beta(),
            r0: defaults::thermistor_r0(),
            t0: defaults::thermistor_t0(),
        }
    }
}

/// Moisture probe divider and calibrated millivolt endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoistureCalibration {
    /// Divider between the probe output and the ADC input.
    #[serde(default = "defaults::moisture_divider")]
    pub divider: Divider,

    /// Probe output at 0% moisture.
    ///
    /// Default: 2800 mV
    #[serde(default = "defaults::moisture_dry_mv")]
    pub dry_millivolts: f64,

    /// Probe output at 100% moisture.
    ///
    /// Default: 500 mV
    #[serde(default = "defaults::moisture_wet_mv")]
    pub wet_millivolts: f64,
}

impl Default for MoistureCalibration {
    fn default() -> Self {
        Self {
            divider: defaults::moisture_divider(),
            dry_millivolts: defaults::moisture_dry_mv(),
            wet_millivolts: defaults::moisture_wet_mv(),
        }
    }
}

/// Battery sense divider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatteryCalibration {
    /// Divider between the battery terminal and the internal ADC input.
    #[serde(default = "defaults::battery_divider")]
    pub divider: Divider,
}

impl Default for BatteryCalibration {
    fn default() -> Self {
        Self {
            divider: defaults::battery_divider(),
        }
    }
}

/// The full calibration table for one monitoring node.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Calibration {
    #[serde(default)]
    pub adc: AdcCalibration,
    #[serde(default)]
    pub photoresistor: PhotoresistorCalibration,
    #[serde(default)]
    pub thermistor: ThermistorCalibration,
    #[serde(default)]
    pub moisture: MoistureCalibration,
    #[serde(default)]
    pub battery: BatteryCalibration,
}

mod defaults {
    use super::Divider;

    pub const fn resolution() -> u32 {
        1024
    }
    pub const fn external_ref_volts() -> f64 {
        2.84
    }
    pub const fn internal_ref_volts() -> f64 {
        1.1
    }

    pub const fn photoresistor_r2() -> f64 {
        9830.0
    }
    pub const fn photoresistor_m() -> f64 {
        -1.1116
    }
    pub const fn photoresistor_b() -> f64 {
        7.3113
    }

    pub const fn thermistor_r2() -> f64 {
        9930.0
    }
    pub const fn thermistor_beta() -> f64 {
        3974.0
    }
    pub const fn thermistor_r0() -> f64 {
        10_000.0
    }
    pub const fn thermistor_t0() -> f64 {
        298.15
    }

    pub const fn moisture_divider() -> Divider {
        Divider::new(406_100.0, 129_900.0)
    }
    pub const fn moisture_dry_mv() -> f64 {
        2800.0
    }
    pub const fn moisture_wet_mv() -> f64 {
        500.0
    }

    pub const fn battery_divider() -> Divider {
        Divider::new(389_700.0, 128_100.0)
    }
}
