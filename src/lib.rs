//! Seedling is the reporting half of a battery-powered plant monitor.
//!
//! The node samples four analog channels (light, temperature, soil moisture,
//! battery voltage); this crate turns those raw ADC codes into physical units
//! and delivers the result as an HTML status email through a minimal SMTP
//! client speaking implicit TLS to a fixed relay.
//!
//! Sampling itself (SPI, GPIO, power sequencing) happens elsewhere. The
//! [`sensor`] module is pure arithmetic over an explicit calibration table,
//! and the [`smtp`] module drives the protocol over a pluggable byte-stream
//! [`smtp::Transport`].

pub mod config;
pub mod logging;
pub mod sensor;
pub mod smtp;

pub use config::{Config, SmtpConfig};
pub use sensor::{AdcSample, Calibration, SensorReader, SensorReading};
pub use smtp::{SendReport, SmtpSession, TlsTransport, Transport};
