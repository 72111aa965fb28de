// ABOUTME: Host port the deployed container is published on.
// ABOUTME: Parsed strictly from caller text; invalid values are rejected, never coerced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid port '{raw}': must be an integer between 1 and 65535")]
pub struct HostPortError {
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostPort(NonZeroU16);

impl HostPort {
    /// Port used when the caller supplies none.
    pub const DEFAULT: HostPort = match NonZeroU16::new(3000) {
        Some(port) => HostPort(port),
        None => unreachable!(),
    };

    /// Parse a decimal port number. Surrounding whitespace, signs, and
    /// anything outside `1..=65535` are errors.
    pub fn parse(raw: &str) -> Result<Self, HostPortError> {
        let err = || HostPortError {
            raw: raw.to_string(),
        };

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        raw.parse::<u16>()
            .ok()
            .and_then(NonZeroU16::new)
            .map(Self)
            .ok_or_else(err)
    }

    pub fn new(port: u16) -> Option<Self> {
        NonZeroU16::new(port).map(Self)
    }

    pub const fn get(&self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
