//! Advisor configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GEMINI_API_KEY` - Google Generative Language API key
//!
//! ## Optional
//! - `GEMINI_MODEL` - Model ID (default: gemini-2.5-flash)
//! - `GEMINI_API_URL` - API base URL (default: <https://generativelanguage.googleapis.com/v1beta>)
//! - `GEMINI_TEMPERATURE` - Sampling temperature, 0.0 to 2.0 (default: 0.4)
//! - `GEMINI_MAX_OUTPUT_TOKENS` - Reply length cap (default: 1024)
//! - `ADVISOR_TIMEOUT_SECS` - Seconds before an analysis gives up (default: 30)
//! - `ADVISOR_LANGUAGE` - Language the advice is written in (default: simple Hinglish)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LANGUAGE: &str =
    "simple Hinglish (Hindi written in Latin script, mixed with easy English)";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Advisory engine configuration.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Gemini API configuration
    pub gemini: GeminiConfig,
    /// Upper bound on one analysis round trip
    pub timeout: Duration,
    /// Language the model is asked to reply in
    pub language: String,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Google API key
    pub api_key: SecretString,
    /// Model ID (e.g., gemini-2.5-flash)
    pub model: String,
    /// API base URL, without the `models/...` path
    pub base_url: Url,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens in the reply
    pub max_output_tokens: u32,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl GeminiConfig {
    /// Full `generateContent` endpoint for the configured model.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the model name produces an invalid URL.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/models/{}:generateContent", self.model))
    }

    fn load(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let base_url = vars.or_default("GEMINI_API_URL", DEFAULT_GEMINI_API_URL);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("GEMINI_API_URL".to_string(), e.to_string()))?;

        let temperature = vars.parsed("GEMINI_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidEnvVar(
                "GEMINI_TEMPERATURE".to_string(),
                format!("must be between 0.0 and 2.0 (got {temperature})"),
            ));
        }

        let max_output_tokens = vars.parsed("GEMINI_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?;
        if max_output_tokens == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GEMINI_MAX_OUTPUT_TOKENS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let model = vars.or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "GEMINI_MODEL".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api_key: vars.validated_secret("GEMINI_API_KEY")?,
            model,
            base_url,
            temperature,
            max_output_tokens,
        })
    }
}

impl AdvisorConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::load(&Vars::new(|key| std::env::var(key).ok()))
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Same as [`AdvisorConfig::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(&Vars::new(|key| vars.get(key).cloned()))
    }

    fn load(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let gemini = GeminiConfig::load(vars)?;

        let timeout_secs: u64 = vars.parsed("ADVISOR_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ADVISOR_TIMEOUT_SECS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let language = vars
            .optional("ADVISOR_LANGUAGE")
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            gemini,
            timeout: Duration::from_secs(timeout_secs),
            language,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup shared by the environment and explicit-map loaders.
struct Vars<'a> {
    lookup: Box<dyn Fn(&str) -> Option<String> + 'a>,
}

impl<'a> Vars<'a> {
    fn new(lookup: impl Fn(&str) -> Option<String> + 'a) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys are random; low entropy means a made-up value
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by Google AI Studio."
            ),
        ));
    }

    Ok(())
}
