//! The reading record and its presentation table.

use std::fmt::Write;

/// One converted reading of all four channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Light intensity in lux.
    pub lux: f64,
    /// Temperature in degrees Fahrenheit.
    pub temperature_f: f64,
    /// Soil moisture percentage.
    pub moisture_percent: f64,
    /// Battery terminal voltage.
    pub battery_volts: f64,
}

/// Label prefix and unit suffix for each channel, in presentation order:
/// light, temperature, moisture, battery. Callers rendering readings depend
/// on both the order and the exact strings.
pub const SENSOR_DESCRIPTIONS: [(&str, &str); 4] = [
    ("&emsp;&emsp;Light Intensity: ", " lux<br>"),
    ("&emsp;&emsp;Temperature: ", "ºF<br>"),
    ("&emsp;&emsp;Moisture Level: ", "%<br>"),
    ("&emsp;&emsp;Battery Level: ", "V<br>"),
];

impl SensorReading {
    /// Render the reading as the HTML fragment embedded in update emails,
    /// one labelled line per channel in [`SENSOR_DESCRIPTIONS`] order.
    #[must_use]
    pub fn to_html(&self) -> String {
        let values = [
            self.lux,
            self.temperature_f,
            self.moisture_percent,
            self.battery_volts,
        ];

        SENSOR_DESCRIPTIONS.iter().zip(values).fold(
            String::new(),
            |mut html, ((prefix, suffix), value)| {
                let _ = write!(html, "{prefix}{value:.2}{suffix}");
                html
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_order() {
        assert_eq!(SENSOR_DESCRIPTIONS.len(), 4);
        assert!(SENSOR_DESCRIPTIONS[0].0.contains("Light Intensity"));
        assert!(SENSOR_DESCRIPTIONS[1].0.contains("Temperature"));
        assert!(SENSOR_DESCRIPTIONS[2].0.contains("Moisture Level"));
        assert!(SENSOR_DESCRIPTIONS[3].0.contains("Battery Level"));
    }

    #[test]
    fn test_to_html() {
        let reading = SensorReading {
            lux: 150.0,
            temperature_f: 77.0,
            moisture_percent: 42.5,
            battery_volts: 3.71,
        };

        assert_eq!(
            reading.to_html(),
            "&emsp;&emsp;Light Intensity: 150.00 lux<br>\
             &emsp;&emsp;Temperature: 77.00ºF<br>\
             &emsp;&emsp;Moisture Level: 42.50%<br>\
             &emsp;&emsp;Battery Level: 3.71V<br>"
        );
    }
}
