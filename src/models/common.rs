use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on poem length, fixed for every request.
pub const MAX_OUTPUT_TOKENS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    User,
    Environment,
}

/// API key authorizing calls to the generation service.
///
/// Always non-empty. `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    key: String,
    source: CredentialSource,
}

impl Credential {
    /// Returns `None` for empty or whitespace-only keys.
    pub fn new(key: &str, source: CredentialSource) -> Option<Self> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            source,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Sampling temperature in `[0.0, 1.0]`, always on a 0.1 grid.
///
/// Stored as tenths so equality and display are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temperature(u8);

impl Temperature {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;
    pub const STEP: f32 = 0.1;

    /// Clamps into range and snaps to the nearest step. NaN yields the default.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        let tenths = (value.clamp(Self::MIN, Self::MAX) * 10.0).round() as u8;
        Self(tenths)
    }

    /// Parses the slider's form value. Out-of-range numbers are clamped.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<f32>().ok().map(Self::new)
    }

    pub fn value(&self) -> f32 {
        debug_assert!(self.0 <= 10, "temperature escaped [0.0, 1.0]");
        f32::from(self.0) / 10.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(7)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

/// Sampling configuration sent alongside the prompt and image.
///
/// Only the temperature varies. The token cap is always [`MAX_OUTPUT_TOKENS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    temperature: Temperature,
}

impl GenerationConfig {
    pub fn new(temperature: Temperature) -> Self {
        Self { temperature }
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn max_output_tokens(&self) -> u32 {
        MAX_OUTPUT_TOKENS
    }
}
