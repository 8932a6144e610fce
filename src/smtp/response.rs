//! Relay reply interpretation.
//!
//! The session only ever cares about the first three bytes of whatever the
//! relay sent back inside one wait window; the rest of the reply (and any
//! trailing lines) has already been drained and is discarded here.

use core::fmt::{self, Display, Formatter};

/// The outcome of one reply read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// A parsed three-digit reply code.
    Code(u16),
    /// Bytes arrived but the leading characters were not a reply code.
    Malformed,
    /// Nothing arrived before the wait window elapsed.
    NoData,
}

impl Reply {
    /// Interpret a drained read.
    ///
    /// Only the leading three bytes are considered, matching what the relay
    /// puts first on every reply line. `Malformed` and `NoData` are both
    /// unequal to every valid SMTP code, so either fails any expectation.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::NoData;
        }

        let prefix = &bytes[..bytes.len().min(3)];

        std::str::from_utf8(prefix)
            .ok()
            .and_then(|code| code.parse::<u16>().ok())
            .map_or(Self::Malformed, Self::Code)
    }

    /// Whether this reply is the code the current step expects.
    #[must_use]
    pub const fn matches(self, expected: u16) -> bool {
        matches!(self, Self::Code(code) if code == expected)
    }
}

impl Display for Reply {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(fmt, "{code}"),
            Self::Malformed => fmt.write_str("malformed reply"),
            Self::NoData => fmt.write_str("no reply before timeout"),
        }
    }
}
