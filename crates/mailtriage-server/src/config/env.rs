// crates/mailtriage-server/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::http::CLASSIFY_TIMEOUT;
use crate::{Result, TriageError};

/// Default completion API base (OpenAI-compatible, `/chat/completions` is appended)
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Small, fast model; classification does not need more
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Completion API key (GROQ_API_KEY)
    pub groq: Option<String>,
}

impl ApiKeys {
    /// Load API keys from environment variables
    ///
    /// Set `TRIAGE_DISABLE_LLM=1` to suppress the key (forces keyword fallback)
    pub fn from_env() -> Self {
        Self::from_vars(&|name| std::env::var(name).ok())
    }

    pub(crate) fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Self {
        if parse_bool(vars("TRIAGE_DISABLE_LLM")).unwrap_or(false) {
            info!("TRIAGE_DISABLE_LLM is set, classifier disabled, using keyword fallback");
            return Self { groq: None };
        }

        let keys = Self {
            groq: vars("GROQ_API_KEY").filter(|k| !k.trim().is_empty()),
        };
        keys.log_status();
        keys
    }

    fn log_status(&self) {
        if self.groq.is_some() {
            debug!("Completion API key loaded");
        } else {
            warn!("No GROQ_API_KEY configured - every email will use keyword fallback");
        }
    }

    pub fn has_classifier(&self) -> bool {
        self.groq.is_some()
    }

    /// Key prefix safe to print (first 10 characters)
    pub fn masked(&self) -> Option<String> {
        self.groq
            .as_ref()
            .map(|k| format!("{}...", k.chars().take(10).collect::<String>()))
    }
}

/// Completion API settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model name (TRIAGE_LLM_MODEL)
    pub model: String,
    /// API base URL (TRIAGE_LLM_BASE_URL)
    pub base_url: String,
    /// Request timeout (TRIAGE_LLM_TIMEOUT_SECS)
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: CLASSIFY_TIMEOUT,
        }
    }
}

impl LlmConfig {
    /// Full chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Fail with every error joined when the configuration is unusable
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TriageError::Config(self.errors.join("; ")))
        }
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Load `.env` files into the process environment: the project file
/// (`project_dir/.env`) first, then the global one (`~/.mailtriage/.env`).
///
/// dotenvy never overwrites a variable that is already set, so the project
/// file wins over the global one and both lose to the real environment.
/// Returns the files that were loaded.
pub fn load_dotenv_files(project_dir: &Path, home_dir: Option<&Path>) -> Vec<PathBuf> {
    let candidates = std::iter::once(project_dir.join(".env"))
        .chain(home_dir.map(|home| home.join(".mailtriage/.env")));

    candidates
        .filter(|path| path.is_file())
        .filter(|path| match dotenvy::from_path(path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable .env file");
                false
            }
        })
        .collect()
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    pub llm: LlmConfig,
    /// Bind host (HOST)
    pub host: String,
    /// Bind port (PORT)
    pub port: u16,
    /// Dashboard HTML override (TRIAGE_DASHBOARD_PATH)
    pub dashboard_path: Option<PathBuf>,
    /// Env values that were set but could not be parsed (name, raw value)
    pub rejected: Vec<(String, String)>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            api_keys: ApiKeys::default(),
            llm: LlmConfig::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dashboard_path: None,
            rejected: Vec::new(),
        }
    }
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_vars(&|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| vars(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut rejected = Vec::new();

        let timeout = match get("TRIAGE_LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    rejected.push(("TRIAGE_LLM_TIMEOUT_SECS".to_string(), raw));
                    CLASSIFY_TIMEOUT
                }
            },
            None => CLASSIFY_TIMEOUT,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                rejected.push(("PORT".to_string(), raw));
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            api_keys: ApiKeys::from_vars(vars),
            llm: LlmConfig {
                model: get("TRIAGE_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("TRIAGE_LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout,
            },
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            dashboard_path: get("TRIAGE_DASHBOARD_PATH").map(PathBuf::from),
            rejected,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        if !self.api_keys.has_classifier() {
            validation.add_warning(
                "No GROQ_API_KEY configured. All emails will be classified by keyword fallback.",
            );
        }

        for (name, raw) in &self.rejected {
            validation.add_warning(format!("Ignoring unparsable {}='{}', using default", name, raw));
        }

        match url::Url::parse(&self.llm.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => validation.add_error(format!(
                "TRIAGE_LLM_BASE_URL must be http(s), got scheme '{}'",
                url.scheme()
            )),
            Err(e) => validation.add_error(format!(
                "Invalid TRIAGE_LLM_BASE_URL '{}': {}",
                self.llm.base_url, e
            )),
        }

        if let Some(ref path) = self.dashboard_path {
            if !path.exists() {
                validation.add_warning(format!(
                    "TRIAGE_DASHBOARD_PATH '{}' does not exist, serving built-in dashboard",
                    path.display()
                ));
            }
        }

        validation
    }
}

fn parse_bool(value: Option<String>) -> Option<bool> {
    match value?.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
