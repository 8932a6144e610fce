//! Externally supplied configuration.
//!
//! Relay coordinates, addresses, pre-encoded credentials, the response wait
//! and the calibration table all arrive through a TOML file rather than
//! living in the source. Every field has a default so a partial file works.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sensor::Calibration;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this configuration.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration for a monitoring node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Mail delivery settings.
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Sensor calibration constants.
    #[serde(default)]
    pub calibration: Calibration,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, is not readable, or is
    /// not valid TOML for this configuration.
    pub fn from_config(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut reader = BufReader::new(File::open(file)?);
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;

        Ok(toml::from_str(&raw)?)
    }
}

/// Settings for the SMTP session.
///
/// Credentials are supplied already base64-encoded; this crate never sees
/// the plaintext forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Mail relay hostname.
    ///
    /// Default: `smtp.gmail.com`
    #[serde(default = "defaults::relay_host")]
    pub host: String,

    /// Mail relay port (implicit TLS).
    ///
    /// Default: 465
    #[serde(default = "defaults::relay_port")]
    pub port: u16,

    /// Name the client announces in HELO.
    ///
    /// Default: `Seedling`
    #[serde(default = "defaults::client_name")]
    pub client_name: String,

    /// Envelope sender address used in MAIL FROM.
    #[serde(default = "defaults::sender")]
    pub sender: String,

    /// Display form used in the message's From header.
    #[serde(default = "defaults::from_header")]
    pub from_header: String,

    /// Default recipient address; overridable per session.
    #[serde(default = "defaults::recipient")]
    pub recipient: String,

    /// Base64-encoded mailbox username.
    #[serde(default)]
    pub username: String,

    /// Base64-encoded mailbox password.
    #[serde(default)]
    pub password: String,

    /// How long to wait for each relay response, in milliseconds.
    ///
    /// Default: 750
    #[serde(default = "defaults::response_wait_ms")]
    pub response_wait_ms: u64,
}

impl SmtpConfig {
    /// The response wait as a [`Duration`].
    #[must_use]
    pub const fn response_wait(&self) -> Duration {
        Duration::from_millis(self.response_wait_ms)
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: defaults::relay_host(),
            port: defaults::relay_port(),
            client_name: defaults::client_name(),
            sender: defaults::sender(),
            from_header: defaults::from_header(),
            recipient: defaults::recipient(),
            username: String::new(),
            password: String::new(),
            response_wait_ms: defaults::response_wait_ms(),
        }
    }
}

mod defaults {
    pub fn relay_host() -> String {
        "smtp.gmail.com".to_string()
    }

    pub const fn relay_port() -> u16 {
        465
    }

    pub fn client_name() -> String {
        "Seedling".to_string()
    }

    pub fn sender() -> String {
        "PLANT@MONITOR.EMAIL".to_string()
    }

    pub fn from_header() -> String {
        "Plant Life Monitor <plantlifemonitor@gmail.com>".to_string()
    }

    pub fn recipient() -> String {
        "DEFAULT@RECEIPIENT.HERE".to_string()
    }

    pub const fn response_wait_ms() -> u64 {
        750
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_defaults() {
        let config = SmtpConfig::default();
        assert_eq!(config.host, "smtp.gmail.com");
        assert_eq!(config.port, 465);
        assert_eq!(config.client_name, "Seedling");
        assert_eq!(config.response_wait_ms, 750);
        assert_eq!(config.response_wait(), Duration::from_millis(750));
        assert!(config.username.is_empty());
        assert!(config.password.is_empty());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.calibration.adc.resolution, 1024);
    }

    #[test]
    fn test_partial_document_overrides() {
        let config: Config = toml::from_str(
            r#"
            [smtp]
            recipient = "gardener@example.com"
            username = "dXNlcg=="
            password = "cGFzcw=="
            response_wait_ms = 250

            [calibration.adc]
            external_ref_volts = 3.3
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.smtp.recipient, "gardener@example.com");
        assert_eq!(config.smtp.username, "dXNlcg==");
        assert_eq!(config.smtp.response_wait_ms, 250);
        // Untouched fields keep their defaults
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert!((config.calibration.adc.external_ref_volts - 3.3).abs() < f64::EPSILON);
        assert!((config.calibration.adc.internal_ref_volts - 1.1).abs() < f64::EPSILON);
    }
}
