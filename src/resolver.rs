//! Turns raw session input into a credential and a generation request.
//!
//! Both functions are pure: the environment fallback is passed in by the
//! caller (see [`crate::config::AppConfig::fallback_api_key`]) and nothing is
//! remembered between calls.

use crate::error::{AppError, Result};
use crate::models::{
    Credential, CredentialSource, GenerationRequest, ImageUpload, Temperature,
};

/// The masked input wins whenever it holds anything but whitespace.
pub fn resolve_credential(user_input: &str, env_fallback: Option<&str>) -> Result<Credential> {
    Credential::new(user_input, CredentialSource::User)
        .or_else(|| {
            env_fallback.and_then(|key| Credential::new(key, CredentialSource::Environment))
        })
        .ok_or(AppError::MissingCredential)
}

/// Validates the inputs of one "Generate Poem" action.
///
/// The prompt is taken as-is (it may be empty). The temperature type already
/// guarantees range and step.
pub fn build_request(
    prompt: &str,
    image: Option<ImageUpload>,
    temperature: Temperature,
) -> Result<GenerationRequest> {
    let image = image.ok_or(AppError::MissingImage)?;
    Ok(GenerationRequest::new(prompt.to_string(), image, temperature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_OUTPUT_TOKENS;

    #[test]
    fn test_user_input_always_wins() {
        for fallback in [None, Some(""), Some("env-key")] {
            let credential = resolve_credential("sk-123", fallback).unwrap();
            assert_eq!(credential.as_str(), "sk-123");
            assert_eq!(credential.source(), CredentialSource::User);
        }
    }

    #[test]
    fn test_user_input_is_trimmed() {
        let credential = resolve_credential("  sk-123\n", Some("env-key")).unwrap();
        assert_eq!(credential.as_str(), "sk-123");
    }

    #[test]
    fn test_falls_back_to_environment() {
        for user_input in ["", "   ", "\t"] {
            let credential = resolve_credential(user_input, Some("env-key")).unwrap();
            assert_eq!(credential.as_str(), "env-key");
            assert_eq!(credential.source(), CredentialSource::Environment);
        }
    }

    #[test]
    fn test_blocked_without_any_key() {
        assert!(matches!(
            resolve_credential("", Some("")),
            Err(AppError::MissingCredential)
        ));
        assert!(matches!(
            resolve_credential(" ", None),
            Err(AppError::MissingCredential)
        ));
        assert!(matches!(
            resolve_credential("", Some("   ")),
            Err(AppError::MissingCredential)
        ));
    }

    #[test]
    fn test_missing_image_is_rejected() {
        for prompt in ["", "Write a haiku"] {
            for tenths in [0, 7, 10] {
                let result = build_request(prompt, None, Temperature::new(tenths as f32 / 10.0));
                assert!(matches!(result, Err(AppError::MissingImage)));
            }
        }
    }

    #[test]
    fn test_request_has_fixed_token_cap() {
        let image = ImageUpload::new(vec![1, 2, 3]);
        let long_prompt = "x".repeat(5000);
        for (prompt, temperature) in [("", 0.0), ("a poem", 0.7), (long_prompt.as_str(), 1.0)] {
            let request =
                build_request(prompt, Some(image.clone()), Temperature::new(temperature)).unwrap();
            assert_eq!(request.config().max_output_tokens(), MAX_OUTPUT_TOKENS);
            assert_eq!(request.prompt, prompt);
            assert_eq!(request.image, image);
        }
    }
}
