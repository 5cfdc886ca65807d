use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Chat session tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Estimated-token threshold above which the conversation history is
    /// summarized. Tokens are estimated as total characters / 4; the
    /// production guideline is 90% of the model context window
    /// (200k window → 180_000), but deployments tune this freely.
    #[serde(default = "d_180000")]
    pub summarize_threshold_tokens: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            summarize_threshold_tokens: 180_000,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_180000() -> usize {
    180_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold() {
        let cfg: ChatConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.summarize_threshold_tokens, 180_000);
    }

    #[test]
    fn threshold_is_configurable() {
        let cfg: ChatConfig = toml::from_str("summarize_threshold_tokens = 1000").unwrap();
        assert_eq!(cfg.summarize_threshold_tokens, 1000);
    }
}
