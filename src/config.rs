use std::env;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

/// Process-wide configuration, read once at startup and passed down explicitly.
#[derive(Clone)]
pub struct AppConfig {
    pub fallback_api_key: Option<String>,
    pub gemini: GeminiConfig,
    pub server: ServerConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let model = non_blank(env::var("GEMINI_MODEL").ok()).unwrap_or_else(|| DEFAULT_MODEL.into());
        let base_url =
            non_blank(env::var("GEMINI_API_BASE").ok()).unwrap_or_else(|| DEFAULT_API_BASE.into());

        GeminiConfig { model, base_url }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 200 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = non_blank(env::var("HOST").ok()).unwrap_or(defaults.host);
        let port = parse_or("PORT", env::var("PORT").ok(), defaults.port);
        let max_upload_bytes =
            upload_limit(env::var("MAX_UPLOAD_MB").ok(), defaults.max_upload_bytes);

        ServerConfig {
            host,
            port,
            max_upload_bytes,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            fallback_api_key: None,
            gemini: GeminiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the environment once. Call after `dotenv::dotenv()`.
    pub fn from_env() -> Self {
        AppConfig {
            fallback_api_key: non_blank(env::var(API_KEY_VAR).ok()),
            gemini: GeminiConfig::from_env(),
            server: ServerConfig::from_env(),
        }
    }

    pub fn with_fallback_api_key(mut self, key: impl Into<String>) -> Self {
        self.fallback_api_key = non_blank(Some(key.into()));
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_server(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }
}

// The fallback key must never end up in a log line.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "fallback_api_key",
                &self.fallback_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini", &self.gemini)
            .field("server", &self.server)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
            default
        }),
    }
}

/// `MAX_UPLOAD_MB` in bytes. Values that overflow `usize` fall back to the default.
fn upload_limit(raw: Option<String>, default_bytes: usize) -> usize {
    let default_mb = default_bytes / (1024 * 1024);
    let mb = parse_or("MAX_UPLOAD_MB", raw.clone(), default_mb);
    mb.checked_mul(1024 * 1024).unwrap_or_else(|| {
        log::warn!(
            "Ignoring invalid MAX_UPLOAD_MB={:?}, using {}",
            raw.unwrap_or_default(),
            default_mb
        );
        default_bytes
    })
}
