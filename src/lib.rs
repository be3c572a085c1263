pub mod app;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod resolver;
#[cfg(feature = "server")]
pub mod server;
pub mod ui;

pub use app::{PoemApp, SessionInput};
pub use config::{AppConfig, GeminiConfig, ServerConfig};
pub use error::{AppError, Result, ServiceError};
pub use gemini::{GeminiClient, PoemGenerator};
pub use models::{
    Credential, CredentialSource, DecodedImage, GenerationConfig, GenerationRequest,
    GenerationResult, ImageFormat, ImageUpload, Temperature, DEFAULT_PROMPT, MAX_OUTPUT_TOKENS,
};
pub use resolver::{build_request, resolve_credential};
