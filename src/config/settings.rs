use crate::core::retry::{Backoff, RetryPolicy};
use crate::utils::error::{Result, TaggerError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TAG_XPATH: &str = "/config/shared/tag";
pub const DEFAULT_COMMIT_DESCRIPTION: &str = "Tags created by panos-tagger";

/// Optional tuning loaded from a TOML file. Every section may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub transport: TransportSettings,
    pub retry: RetrySettings,
    pub commit: CommitSettings,
    pub tags: TagSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    pub scheme: String,
    pub timeout_seconds: u64,
    /// 管理介面多半是自簽憑證，預設不驗證
    pub accept_invalid_certs: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            timeout_seconds: 30,
            accept_invalid_certs: true,
        }
    }
}

impl TransportSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    None,
    Fixed,
    Exponential,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff: BackoffKind,
    pub delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffKind::None,
            delay_ms: 0,
            max_delay_ms: 10_000,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        let backoff = match self.backoff {
            BackoffKind::None => Backoff::None,
            BackoffKind::Fixed => Backoff::Fixed(Duration::from_millis(self.delay_ms)),
            BackoffKind::Exponential => Backoff::Exponential {
                base: Duration::from_millis(self.delay_ms),
                max: Duration::from_millis(self.max_delay_ms),
            },
        };
        RetryPolicy::new(self.max_attempts, backoff)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitSettings {
    pub description: String,
    /// Only commit when at least one tag came back with status 200.
    pub require_verified: bool,
}

impl Default for CommitSettings {
    fn default() -> Self {
        Self {
            description: DEFAULT_COMMIT_DESCRIPTION.to_string(),
            require_verified: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSettings {
    pub xpath: String,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            xpath: DEFAULT_TAG_XPATH.to_string(),
        }
    }
}

impl Settings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| TaggerError::ConfigError {
                message: format!(
                    "Cannot read settings file '{}': {}",
                    path.as_ref().display(),
                    e
                ),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TaggerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COMMIT_NOTE})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TaggerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_scheme("transport.scheme", &self.transport.scheme)?;
        validation::validate_positive_number(
            "transport.timeout_seconds",
            self.transport.timeout_seconds,
            1,
        )?;
        validation::validate_range("retry.max_attempts", self.retry.max_attempts, 1, 20)?;
        if self.retry.backoff == BackoffKind::Exponential {
            validation::validate_positive_number("retry.delay_ms", self.retry.delay_ms, 1)?;
            validation::validate_positive_number(
                "retry.max_delay_ms",
                self.retry.max_delay_ms,
                self.retry.delay_ms,
            )?;
        }
        validation::validate_non_empty_string("commit.description", &self.commit.description)?;
        validation::validate_xpath("tags.xpath", &self.tags.xpath)?;
        Ok(())
    }
}
