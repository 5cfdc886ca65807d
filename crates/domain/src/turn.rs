use serde::{Deserialize, Serialize};

/// A single message in a conversation.
///
/// Turns are immutable once created and owned exclusively by the session
/// that created them — they are never shared across connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

// ── Convenience constructors ───────────────────────────────────────

impl Turn {
    pub fn human(text: impl Into<String>) -> Self {
        Self { role: Role::Human, content: text.into() }
    }
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Human).unwrap(), r#""human""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn constructors_set_role() {
        assert_eq!(Turn::human("hi").role, Role::Human);
        assert_eq!(Turn::assistant("hello").role, Role::Assistant);
    }
}
