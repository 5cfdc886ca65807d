use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM gateway
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuration for the hosted language-model gateway.
///
/// Every gateway call a session makes uses this fixed configuration —
/// sessions never override model, temperature, or timeout per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier sent with every request.
    #[serde(default = "d_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "d_0_7")]
    pub temperature: f32,
    /// Request timeout in seconds. A call that exceeds this fails the
    /// triggering event; there is no automatic retry.
    #[serde(default = "d_60")]
    pub timeout_sec: u64,
    /// Maximum tokens in a completion.
    #[serde(default = "d_4096")]
    pub max_tokens: u32,
    /// Stop sequences. Empty by default (none sent).
    #[serde(default)]
    pub stop_sequences: Vec<String>,
    /// API base URL.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: d_model(),
            temperature: 0.7,
            timeout_sec: 60,
            max_tokens: 4096,
            stop_sequences: Vec::new(),
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_model() -> String {
    "claude-3-opus-20240229".into()
}
fn d_0_7() -> f32 {
    0.7
}
fn d_60() -> u64 {
    60
}
fn d_4096() -> u32 {
    4096
}
fn d_base_url() -> String {
    "https://api.anthropic.com".into()
}
fn d_api_key_env() -> String {
    "ANTHROPIC_API_KEY".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_all_defaults() {
        let cfg: LlmConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.model, "claude-3-opus-20240229");
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.timeout_sec, 60);
        assert!(cfg.stop_sequences.is_empty());
        assert_eq!(cfg.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn overrides_parse() {
        let toml_str = r#"
            model = "claude-sonnet-4-20250514"
            temperature = 0.2
            timeout_sec = 30
            stop_sequences = ["END"]
        "#;
        let cfg: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.model, "claude-sonnet-4-20250514");
        assert_eq!(cfg.timeout_sec, 30);
        assert_eq!(cfg.stop_sequences, vec!["END".to_string()]);
    }
}
