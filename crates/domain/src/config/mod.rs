mod chat;
mod llm;
mod server;

pub use chat::*;
pub use llm::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.llm.model.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "llm.model".into(),
                message: "model identifier must not be empty".into(),
            });
        }
        if self.llm.timeout_sec == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "llm.timeout_sec".into(),
                message: "timeout must be greater than zero".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                field: "llm.temperature".into(),
                message: format!(
                    "temperature {} is outside the usual 0.0–1.0 range",
                    self.llm.temperature
                ),
            });
        }
        if self.chat.summarize_threshold_tokens == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "chat.summarize_threshold_tokens".into(),
                message: "summarization threshold must be greater than zero".into(),
            });
        }

        issues
    }
}
