use crate::{
    config::AppConfig,
    error::{Result, ServiceError},
    gemini::PoemGenerator,
    logger,
    models::{
        Credential, DecodedImage, GenerationRequest, GenerationResult, ImageUpload, Temperature,
        DEFAULT_PROMPT,
    },
    resolver,
    ui::{presenter, Page},
};
use std::sync::Arc;
use uuid::Uuid;

/// One submission of the form. Nothing here outlives the request.
#[derive(Clone, Default)]
pub struct SessionInput {
    pub api_key: String,
    /// `None` until the form has been submitted once.
    pub prompt: Option<String>,
    /// Raw slider value.
    pub temperature: Option<String>,
    pub image: Option<ImageUpload>,
    /// The Generate button was pressed.
    pub generate: bool,
}

impl std::fmt::Debug for SessionInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let api_key = if self.api_key.trim().is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("SessionInput")
            .field("api_key", &api_key)
            .field("prompt", &self.prompt)
            .field("temperature", &self.temperature)
            .field("image", &self.image)
            .field("generate", &self.generate)
            .finish()
    }
}

impl SessionInput {
    pub fn temperature(&self) -> Temperature {
        match self.temperature.as_deref() {
            None => Temperature::default(),
            Some(raw) => Temperature::parse(raw).unwrap_or_else(|| {
                log::warn!("Ignoring unparseable temperature {:?}", raw);
                Temperature::default()
            }),
        }
    }
}

/// Resolves, generates and lays out one page per user action.
#[derive(Clone)]
pub struct PoemApp {
    generator: Arc<dyn PoemGenerator>,
    fallback_api_key: Option<String>,
}

impl PoemApp {
    pub fn new(generator: Arc<dyn PoemGenerator>, config: &AppConfig) -> Self {
        Self {
            generator,
            fallback_api_key: config.fallback_api_key.clone(),
        }
    }

    pub async fn handle(&self, input: SessionInput) -> Page {
        let request_id = Uuid::new_v4();
        let mut page = presenter::header(&input.api_key);

        let credential = match resolver::resolve_credential(
            &input.api_key,
            self.fallback_api_key.as_deref(),
        ) {
            Ok(credential) => credential,
            Err(err) => {
                log::warn!("[req:{}] {}", request_id, err);
                page.push(presenter::present_failure(&err));
                return page;
            }
        };

        let temperature = input.temperature();
        let prompt = input
            .prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());
        for block in presenter::controls(&prompt, temperature) {
            page.push(block);
        }

        if !input.generate {
            return page;
        }

        log::info!(
            "[req:{}] Generate requested (key from {:?}, temperature {}, image {})",
            request_id,
            credential.source(),
            temperature,
            if input.image.is_some() { "present" } else { "absent" }
        );

        let outcome = match self
            .generate(&credential, &prompt, input.image, temperature)
            .await
        {
            Ok((image, result)) => {
                log::info!(
                    "[req:{}] Poem generated ({} chars)",
                    request_id,
                    result.text.chars().count()
                );
                presenter::present(&image, &result)
            }
            Err(err) => {
                log::warn!("[req:{}] Generation did not complete: {:?}", request_id, err);
                presenter::present_failure(&err)
            }
        };
        page.push(outcome);
        page
    }

    /// Builds the request and, if it is valid, invokes the generator once.
    pub async fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
        image: Option<ImageUpload>,
        temperature: Temperature,
    ) -> Result<(DecodedImage, GenerationResult)> {
        let request = resolver::build_request(prompt, image, temperature)?;
        Ok(self.invoke(credential, &request).await?)
    }

    /// Decode and remote call share one error boundary.
    pub async fn invoke(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> std::result::Result<(DecodedImage, GenerationResult), ServiceError> {
        let image = DecodedImage::decode(&request.image)?;

        let _timer = logger::timer(&format!("{} generateContent", self.generator.model()));
        let result = self
            .generator
            .generate(credential, &request.prompt, &image, request.config())
            .await?;
        Ok((image, result))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::models::GenerationConfig;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory generator that records what it was asked.
    pub struct FakeGenerator {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_config: Mutex<Option<(String, String, GenerationConfig)>>,
    }

    impl FakeGenerator {
        pub fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_config: Mutex::new(None),
            })
        }

        pub fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_config: Mutex::new(None),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// `(credential, prompt, config)` of the most recent call.
        pub fn last_call(&self) -> Option<(String, String, GenerationConfig)> {
            self.last_config.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PoemGenerator for FakeGenerator {
        async fn generate(
            &self,
            credential: &Credential,
            prompt: &str,
            _image: &DecodedImage,
            config: GenerationConfig,
        ) -> std::result::Result<GenerationResult, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_config.lock().unwrap() = Some((
                credential.as_str().to_string(),
                prompt.to_string(),
                config,
            ));
            match &self.reply {
                Ok(text) => Ok(GenerationResult::new(text.clone())),
                Err(message) => Err(ServiceError::Api {
                    status: 429,
                    message: message.clone(),
                }),
            }
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }
}
