//! Gateway configuration.
//!
//! Configuration is loaded once from environment variables at startup and
//! is read-only afterwards. All secret fields are `SecretString` and are
//! redacted in Debug output.

use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Default LiveKit room name.
pub const DEFAULT_ROOM_NAME: &str = "default-room";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default location of the chat system preamble.
pub const DEFAULT_SYSTEM_PROMPT_PATH: &str = "src/prompts/system_prompt.md";

/// Default speech-to-text model.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default OpenAI-compatible API base URL for transcription.
pub const DEFAULT_TRANSCRIPTION_BASE_URL: &str = "https://api.openai.com/v1";

/// Default CORS allow-list.
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Default deployment environment label.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Which strategy answers chat prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatBackend {
    /// Delegate to the Gemini generative API.
    Gemini,
    /// Rule-based canned replies.
    Keyword,
}

impl ChatBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatBackend::Gemini => "gemini",
            ChatBackend::Keyword => "keyword",
        }
    }
}

/// LiveKit credentials used to sign room tokens.
#[derive(Clone)]
pub struct LivekitConfig {
    /// API key, emitted as the token `iss`.
    pub api_key: String,

    /// Shared HMAC secret.
    pub api_secret: SecretString,

    /// Room used when a request does not name one.
    pub default_room: String,

    /// Client-facing LiveKit server URL, returned alongside tokens.
    pub url: Option<String>,
}

impl fmt::Debug for LivekitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivekitConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("default_room", &self.default_room)
            .field("url", &self.url)
            .finish()
    }
}

/// Gemini chat settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

/// Speech-to-text settings.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8000").
    pub bind_address: String,

    /// Token signing credentials; `None` disables the token routes.
    pub livekit: Option<LivekitConfig>,

    /// Selected chat strategy.
    pub chat_backend: ChatBackend,

    /// Present when `chat_backend` is `Gemini`.
    pub gemini: Option<GeminiConfig>,

    /// Path of the optional chat system preamble.
    pub system_prompt_path: String,

    /// Present when audio transcription is enabled.
    pub transcription: Option<TranscriptionConfig>,

    /// Origins allowed by CORS.
    pub cors_allowed_origins: Vec<String>,

    /// Deployment environment label reported by `GET /`.
    pub environment: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("LIVEKIT_API_KEY and LIVEKIT_API_SECRET must be set together")]
    IncompleteLivekitCredentials,

    #[error("Invalid LiveKit configuration: {0}")]
    InvalidLivekitConfig(String),

    #[error("Invalid chat backend '{0}', expected 'gemini' or 'keyword'")]
    InvalidChatBackend(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = non_empty(vars, "BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let livekit = Self::livekit_from_vars(vars)?;

        let gemini_api_key = non_empty(vars, "GEMINI_API_KEY");

        let chat_backend = match non_empty(vars, "CHAT_BACKEND").as_deref() {
            Some("gemini") => ChatBackend::Gemini,
            Some("keyword") => ChatBackend::Keyword,
            Some(other) => return Err(ConfigError::InvalidChatBackend(other.to_string())),
            None if gemini_api_key.is_some() => ChatBackend::Gemini,
            None => ChatBackend::Keyword,
        };

        let gemini = match chat_backend {
            ChatBackend::Gemini => {
                let api_key = gemini_api_key
                    .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;
                Some(GeminiConfig {
                    api_key: SecretString::from(api_key),
                    model: non_empty(vars, "GEMINI_MODEL")
                        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                    base_url: non_empty(vars, "GEMINI_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                })
            }
            ChatBackend::Keyword => None,
        };

        let system_prompt_path = non_empty(vars, "SYSTEM_PROMPT_PATH")
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT_PATH.to_string());

        let transcription = non_empty(vars, "OPENAI_API_KEY").map(|api_key| TranscriptionConfig {
            api_key: SecretString::from(api_key),
            model: non_empty(vars, "TRANSCRIPTION_MODEL")
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            base_url: non_empty(vars, "TRANSCRIPTION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_BASE_URL.to_string()),
        });

        let cors_allowed_origins = non_empty(vars, "CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(ToString::to_string)
            .collect();

        let environment =
            non_empty(vars, "ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        Ok(Config {
            bind_address,
            livekit,
            chat_backend,
            gemini,
            system_prompt_path,
            transcription,
            cors_allowed_origins,
            environment,
        })
    }

    fn livekit_from_vars(
        vars: &HashMap<String, String>,
    ) -> Result<Option<LivekitConfig>, ConfigError> {
        let api_key = non_empty(vars, "LIVEKIT_API_KEY");
        let api_secret = vars
            .get("LIVEKIT_API_SECRET")
            .filter(|v| !v.trim().is_empty())
            .cloned();

        let (api_key, api_secret) = match (api_key, api_secret) {
            (None, None) => return Ok(None),
            (Some(key), Some(secret)) => (key, SecretString::from(secret)),
            (Some(_), None) if vars.contains_key("LIVEKIT_API_SECRET") => {
                return Err(ConfigError::InvalidLivekitConfig(
                    "LIVEKIT_API_SECRET must not be empty".to_string(),
                ));
            }
            _ => return Err(ConfigError::IncompleteLivekitCredentials),
        };

        let default_room =
            non_empty(vars, "LIVEKIT_ROOM").unwrap_or_else(|| DEFAULT_ROOM_NAME.to_string());

        Ok(Some(LivekitConfig {
            api_key,
            api_secret,
            default_room,
            url: non_empty(vars, "LIVEKIT_URL"),
        }))
    }
}

/// Read a variable, treating empty/whitespace values as unset.
fn non_empty(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
