//! Conversions from raw ADC codes to physical units.

use super::calibration::{AdcSource, Calibration, Divider};
use super::reading::SensorReading;

/// One raw sample of all four channels, 10-bit codes as read.
///
/// Light, temperature and moisture come from the external converter; the
/// battery channel from the internal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcSample {
    pub light: u16,
    pub temperature: u16,
    pub moisture: u16,
    pub battery: u16,
}

/// Stateless converter from ADC codes to physical units.
///
/// Every method is a pure function of its arguments and the calibration
/// table, so readings can be verified against bench measurements without
/// any hardware attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorReader {
    calibration: Calibration,
}

impl SensorReader {
    #[must_use]
    pub const fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    #[must_use]
    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Voltage seen at the converter input for a raw code.
    #[must_use]
    pub fn adc_to_voltage(&self, code: u16, source: AdcSource) -> f64 {
        (f64::from(code) + 1.0) / f64::from(self.calibration.adc.resolution)
            * self.calibration.adc.reference_volts(source)
    }

    /// Input voltage of a divider given the drop measured across one of its
    /// known resistors.
    #[must_use]
    pub fn divider_input_voltage(&self, divider: Divider, v_drop: f64, across_r1: bool) -> f64 {
        let vin = v_drop * (divider.r1 + divider.r2);

        if across_r1 { vin / divider.r1 } else { vin / divider.r2 }
    }

    /// Unknown upper resistor of a divider given the voltage measured across
    /// the known lower resistor.
    #[must_use]
    pub fn divider_unknown_resistance(&self, v_meas: f64, r2: f64, source: AdcSource) -> f64 {
        let reference = self.calibration.adc.reference_volts(source);

        (reference * r2 - v_meas * r2) / v_meas
    }

    /// Light intensity in lux from the photoresistor's resistance, via the
    /// sensor's power-law fit.
    #[must_use]
    pub fn lux(&self, resistance: f64) -> f64 {
        let fit = &self.calibration.photoresistor;

        resistance.powf(fit.m) * 10f64.powf(fit.b)
    }

    /// Temperature in Kelvin from the thermistor's resistance via the Beta
    /// equation.
    ///
    /// A reading of exactly the rated room-temperature resistance would put
    /// ln(1) = 0 in the divisor, so that case short-circuits to the rated
    /// reference temperature.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn kelvin(&self, resistance: f64) -> f64 {
        let t = &self.calibration.thermistor;

        if resistance == t.r0 {
            return t.t0;
        }

        let log_ratio = (t.r0 / resistance).ln();

        (t.t0 * t.beta / log_ratio) / (t.beta / log_ratio - t.t0)
    }

    /// Temperature in degrees Fahrenheit from the thermistor's resistance.
    #[must_use]
    pub fn fahrenheit(&self, resistance: f64) -> f64 {
        self.kelvin(resistance) * 1.8 - 459.67
    }

    /// Temperature in degrees Celsius from the thermistor's resistance.
    #[must_use]
    pub fn celsius(&self, resistance: f64) -> f64 {
        self.kelvin(resistance) - 273.15
    }

    /// Moisture percentage from the probe's output in millivolts.
    ///
    /// Linear between the calibrated dry (0%) and wet (100%) endpoints, and
    /// deliberately unclamped outside them.
    #[must_use]
    pub fn moisture_percent(&self, millivolts: f64) -> f64 {
        let m = &self.calibration.moisture;

        (millivolts - m.dry_millivolts) * 100.0 / (m.wet_millivolts - m.dry_millivolts)
    }

    /// Battery terminal voltage from the voltage measured at the internal
    /// ADC input.
    #[must_use]
    pub fn battery_volts(&self, v_meas: f64) -> f64 {
        self.divider_input_voltage(self.calibration.battery.divider, v_meas, false)
    }

    /// Convert one full raw sample into a [`SensorReading`].
    #[must_use]
    pub fn read(&self, sample: AdcSample) -> SensorReading {
        let light_v = self.adc_to_voltage(sample.light, AdcSource::External);
        let photoresistor = self.divider_unknown_resistance(
            light_v,
            self.calibration.photoresistor.divider_r2,
            AdcSource::External,
        );

        let temp_v = self.adc_to_voltage(sample.temperature, AdcSource::External);
        let thermistor = self.divider_unknown_resistance(
            temp_v,
            self.calibration.thermistor.divider_r2,
            AdcSource::External,
        );

        let moist_v = self.adc_to_voltage(sample.moisture, AdcSource::External);
        let moisture_mv =
            self.divider_input_voltage(self.calibration.moisture.divider, moist_v, false) * 1000.0;

        let battery_v = self.adc_to_voltage(sample.battery, AdcSource::Internal);

        SensorReading {
            lux: self.lux(photoresistor),
            temperature_f: self.fahrenheit(thermistor),
            moisture_percent: self.moisture_percent(moisture_mv),
            battery_volts: self.battery_volts(battery_v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> SensorReader {
        SensorReader::new(Calibration::default())
    }

    #[test]
    fn test_adc_to_voltage() {
        let reader = reader();
        // (511 + 1) / 1024 is exactly half scale
        assert!((reader.adc_to_voltage(511, AdcSource::External) - 1.42).abs() < 1e-12);
        // full scale hits the reference
        assert!((reader.adc_to_voltage(1023, AdcSource::Internal) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_divider_input_voltage() {
        let reader = reader();
        let divider = Divider::new(100.0, 300.0);
        assert!((reader.divider_input_voltage(divider, 1.5, false) - 2.0).abs() < 1e-12);
        assert!((reader.divider_input_voltage(divider, 1.5, true) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_divider_unknown_resistance() {
        let reader = reader();
        // Half the external reference across equal resistors
        let r1 = reader.divider_unknown_resistance(1.42, 1000.0, AdcSource::External);
        assert!((r1 - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_lux_fit() {
        let reader = reader();
        // 10 kΩ: 10^(4 * -1.1116 + 7.3113) = 10^2.8649
        assert!((reader.lux(10_000.0) - 732.66).abs() < 0.5);
        // Darker means more resistance means fewer lux
        assert!(reader.lux(50_000.0) < reader.lux(10_000.0));
        assert!(reader.lux(1_000.0) > reader.lux(10_000.0));
    }

    #[test]
    fn test_kelvin_degenerate_branch() {
        let reader = reader();
        // Rated resistance maps to the rated temperature exactly
        assert!((reader.kelvin(10_000.0) - 298.15).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kelvin_beta_formula() {
        let reader = reader();
        // Half the rated resistance is warmer than room temperature
        let k = reader.kelvin(5_000.0);
        assert!(k > 298.15 && k < 320.0, "kelvin(5k) = {k}");
        assert!((k - 314.5).abs() < 0.2);
        // Double the rated resistance is colder
        assert!(reader.kelvin(20_000.0) < 298.15);
    }

    #[test]
    fn test_temperature_transforms() {
        let reader = reader();
        // 298.15 K is 25 C / 77 F
        assert!((reader.celsius(10_000.0) - 25.0).abs() < 1e-9);
        assert!((reader.fahrenheit(10_000.0) - 77.0).abs() < 1e-9);
        // The transforms stay consistent off the degenerate branch too
        let k = reader.kelvin(7_500.0);
        assert!((reader.celsius(7_500.0) - (k - 273.15)).abs() < 1e-9);
        assert!((reader.fahrenheit(7_500.0) - (k * 1.8 - 459.67)).abs() < 1e-9);
    }

    #[test]
    fn test_moisture_endpoints() {
        let reader = reader();
        assert!((reader.moisture_percent(2800.0) - 0.0).abs() < 1e-9);
        assert!((reader.moisture_percent(500.0) - 100.0).abs() < 1e-9);
        assert!((reader.moisture_percent(1650.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_moisture_extrapolates_unclamped() {
        let reader = reader();
        // Beyond the wet endpoint keeps going past 100
        assert!((reader.moisture_percent(270.0) - 110.0).abs() < 1e-9);
        // Drier than the dry endpoint goes negative
        assert!((reader.moisture_percent(3030.0) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_battery_volts() {
        let reader = reader();
        // 0.9 V at the pin, through the 389.7k/128.1k divider
        assert!((reader.battery_volts(0.9) - 3.6379).abs() < 1e-3);
    }

    #[test]
    fn test_read_matches_individual_conversions() {
        let reader = reader();
        let sample = AdcSample {
            light: 400,
            temperature: 520,
            moisture: 300,
            battery: 700,
        };

        let reading = reader.read(sample);

        let light_v = reader.adc_to_voltage(400, AdcSource::External);
        let pr = reader.divider_unknown_resistance(light_v, 9830.0, AdcSource::External);
        assert!((reading.lux - reader.lux(pr)).abs() < 1e-9);

        let battery_v = reader.adc_to_voltage(700, AdcSource::Internal);
        assert!((reading.battery_volts - reader.battery_volts(battery_v)).abs() < 1e-9);
    }
}
