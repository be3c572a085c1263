pub mod content_client;
pub mod traits;

use crate::{
    config::GeminiConfig,
    error::ServiceError,
    models::{Credential, DecodedImage, GenerationConfig, GenerationResult},
};
use async_trait::async_trait;

pub use content_client::ContentClient;
pub use traits::PoemGenerator;

/// Entry point for the Google Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    content_client: ContentClient,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            content_client: ContentClient::new(client, config),
        }
    }

    pub fn content(&self) -> &ContentClient {
        &self.content_client
    }
}

#[async_trait]
impl PoemGenerator for GeminiClient {
    async fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
        image: &DecodedImage,
        config: GenerationConfig,
    ) -> Result<GenerationResult, ServiceError> {
        self.content_client
            .generate(credential, prompt, image, config)
            .await
    }

    fn model(&self) -> &str {
        self.content_client.model()
    }
}
