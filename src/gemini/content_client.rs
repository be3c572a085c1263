use crate::{
    config::GeminiConfig,
    error::ServiceError,
    models::{
        gemini::{
            Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, Part,
            WireGenerationConfig,
        },
        Credential, DecodedImage, GenerationConfig, GenerationResult, MAX_OUTPUT_TOKENS,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Calls `models/{model}:generateContent` with a prompt and one inline image.
#[derive(Clone)]
pub struct ContentClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ContentClient {
    pub fn new(client: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
            model: config.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
        image: &DecodedImage,
        config: GenerationConfig,
    ) -> Result<GenerationResult, ServiceError> {
        let payload = build_payload(prompt, image, config);

        log::info!("Invoking model: {}", self.model);
        log::debug!(
            "generateContent: prompt {} chars, {} image {}x{} ({} bytes), temperature {}, maxOutputTokens {}",
            prompt.chars().count(),
            image.format.mime_type(),
            image.width,
            image.height,
            image.bytes().len(),
            config.temperature(),
            MAX_OUTPUT_TOKENS
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, credential.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed before a response: {}", e);
                ServiceError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = parse_error(status, &body);
            log::error!("Gemini service error {}: {}", status.as_u16(), err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        extract_text(parsed)
    }
}

fn build_payload(
    prompt: &str,
    image: &DecodedImage,
    config: GenerationConfig,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::text(prompt),
                Part::inline(image.format.mime_type(), image.to_base64()),
            ],
        }],
        generation_config: WireGenerationConfig {
            temperature: config.temperature().value(),
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

/// The provider's own message when the body carries one.
fn parse_error(status: reqwest::StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.to_string());

    ServiceError::Api {
        status: status.as_u16(),
        message,
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<GenerationResult, ServiceError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ServiceError::Blocked(format!(
            "The prompt was blocked by the service: {}",
            reason
        )));
    }

    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        ServiceError::EmptyResponse("The service returned no candidates".into())
    })?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ServiceError::EmptyResponse(format!(
            "The response contained no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(GenerationResult::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::fixtures;
    use crate::models::{CredentialSource, ImageUpload, Temperature};
    use mockito::Matcher;
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn client_for(url: &str) -> ContentClient {
        let config = GeminiConfig::new().with_base_url(url);
        ContentClient::new(reqwest::Client::new(), &config)
    }

    fn credential() -> Credential {
        Credential::new("sk-123", CredentialSource::User).unwrap()
    }

    fn image() -> DecodedImage {
        DecodedImage::decode(&ImageUpload::new(fixtures::png(2, 2))).unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let image = image();
        let payload = build_payload("a poem", &image, GenerationConfig::new(Temperature::new(0.3)));
        // Round-trip through text: that is what goes over the wire.
        let wire = serde_json::to_string(&payload).unwrap();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "a poem");
        assert_eq!(
            value["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            value["contents"][0]["parts"][1]["inlineData"]["data"],
            image.to_base64()
        );
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 150);
        assert_eq!(value["generationConfig"]["temperature"], json!(0.3));
    }

    #[test]
    fn test_payload_token_cap_is_fixed() {
        let image = image();
        for tenths in 0..=10 {
            let config = GenerationConfig::new(Temperature::new(tenths as f32 / 10.0));
            let value = serde_json::to_value(build_payload("", &image, config)).unwrap();
            assert_eq!(value["generationConfig"]["maxOutputTokens"], 150);
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_network_error() {
        // Nothing listens on port 1.
        let err = client_for("http://127.0.0.1:1")
            .generate(
                &credential(),
                "poem",
                &image(),
                GenerationConfig::new(Temperature::default()),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "network");
        assert!(matches!(
            crate::ui::presenter::present_error(&err),
            crate::ui::Block::Error { message } if message.starts_with("An error occurred: ")
        ));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "sk-123")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "temperature": 0.7, "maxOutputTokens": 150 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{ "text": "Leaves fall, " }, { "text": "soft and slow." }]
                        },
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = client_for(&server.url())
            .generate(
                &credential(),
                "Write a short poem inspired by this image",
                &image(),
                GenerationConfig::new(Temperature::default()),
            )
            .await
            .unwrap();

        assert_eq!(result.text, "Leaves fall, soft and slow.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(429)
            .with_body(
                json!({
                    "error": { "code": 429, "message": "rate limit exceeded", "status": "RESOURCE_EXHAUSTED" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client_for(&server.url())
            .generate(
                &credential(),
                "poem",
                &image(),
                GenerationConfig::new(Temperature::default()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Api { status: 429, .. }));
        assert_eq!(err.to_string(), "rate limit exceeded");
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(502)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let err = client_for(&server.url())
            .generate(
                &credential(),
                "poem",
                &image(),
                GenerationConfig::new(Temperature::default()),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "upstream unavailable");
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string())
            .create_async()
            .await;

        let err = client_for(&server.url())
            .generate(
                &credential(),
                "poem",
                &image(),
                GenerationConfig::new(Temperature::default()),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "blocked");
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_candidate_without_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();
        let err = extract_text(response).unwrap_err();
        assert_eq!(err.kind(), "empty_response");
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(ServiceError::EmptyResponse(_))
        ));
    }
}
