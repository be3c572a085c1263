use super::common::{GenerationConfig, Temperature};
use super::image::ImageUpload;
use serde::Serialize;

pub const DEFAULT_PROMPT: &str = "Write a short poem inspired by this image";

/// Everything needed for one generation call. Built fresh per action.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub image: ImageUpload,
    pub temperature: Temperature,
}

impl GenerationRequest {
    pub(crate) fn new(prompt: String, image: ImageUpload, temperature: Temperature) -> Self {
        Self {
            prompt,
            image,
            temperature,
        }
    }

    pub fn config(&self) -> GenerationConfig {
        GenerationConfig::new(self.temperature)
    }
}

/// Poem text returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub text: String,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
