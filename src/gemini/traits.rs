use crate::{
    error::ServiceError,
    models::{Credential, DecodedImage, GenerationConfig, GenerationResult},
};
use async_trait::async_trait;

/// A remote capability that writes text about an image.
#[async_trait]
pub trait PoemGenerator: Send + Sync {
    /// One blocking round-trip. Not retried.
    async fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
        image: &DecodedImage,
        config: GenerationConfig,
    ) -> Result<GenerationResult, ServiceError>;

    fn model(&self) -> &str;
}
