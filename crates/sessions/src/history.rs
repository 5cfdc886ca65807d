//! Conversation history and the context-budget policy.
//!
//! History is an ordered, append-only-until-truncated sequence of turns.
//! Two operations replace it wholesale: rewind (destructive truncation to
//! a client-chosen index) and summarization (lossy compaction that keeps
//! the last two turns verbatim). Rewind indices computed before a
//! summarization are meaningless afterward — a documented limitation.

use sm_domain::turn::Turn;

use crate::prompts::SUMMARY_PREFIX;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ConversationHistory
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ordered dialogue history for one chat session.
///
/// Alternation is not enforced — multiple human turns may follow each
/// other, e.g. while a gateway reply never arrived.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Truncate to the first `index + 1` turns. Returns `false` without
    /// touching anything when the index is out of range — the caller
    /// treats that as a silent no-op, not an error.
    pub fn rewind(&mut self, index: i64) -> bool {
        if index < 0 || index as usize >= self.turns.len() {
            return false;
        }
        self.turns.truncate(index as usize + 1);
        true
    }

    /// Rough token estimate: 4 characters per token across all turns.
    /// Integer division truncates, so a partial trailing token does not
    /// count toward the budget.
    pub fn estimated_tokens(&self) -> usize {
        let total_chars: usize = self.turns.iter().map(|t| t.content.chars().count()).sum();
        total_chars / 4
    }

    /// Whether the history has outgrown the configured budget.
    pub fn should_summarize(&self, threshold_tokens: usize) -> bool {
        self.estimated_tokens() > threshold_tokens
    }

    /// The turns eligible for summarization: everything except the last
    /// two, which are always preserved verbatim.
    pub fn older_turns(&self) -> &[Turn] {
        let keep_from = self.turns.len().saturating_sub(2);
        &self.turns[..keep_from]
    }

    /// Replace the history wholesale (summarization).
    pub fn replace(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Compaction
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build the post-summarization history: one synthetic assistant turn
/// wrapping the summary, followed by the last two original turns verbatim
/// in their original order.
///
/// Pure function, independent of the gateway call that produced `summary`.
pub fn compress(turns: &[Turn], summary: &str) -> Vec<Turn> {
    let mut out = Vec::with_capacity(3);
    out.push(Turn::assistant(format!("{SUMMARY_PREFIX}{summary}")));
    let keep_from = turns.len().saturating_sub(2);
    out.extend_from_slice(&turns[keep_from..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(n: usize) -> ConversationHistory {
        let mut history = ConversationHistory::new();
        for i in 0..n {
            if i % 2 == 0 {
                history.push(Turn::human(format!("msg {i}")));
            } else {
                history.push(Turn::assistant(format!("reply {i}")));
            }
        }
        history
    }

    #[test]
    fn rewind_truncates_to_index_plus_one() {
        let mut history = history_of(4);
        assert!(history.rewind(1));
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[1].content, "reply 1");
    }

    #[test]
    fn rewind_to_last_index_is_a_valid_noop_length() {
        let mut history = history_of(3);
        assert!(history.rewind(2));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn rewind_out_of_range_changes_nothing() {
        let mut history = history_of(4);
        assert!(!history.rewind(4));
        assert!(!history.rewind(-1));
        assert!(!history.rewind(100));
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn rewind_on_empty_history_is_rejected() {
        let mut history = ConversationHistory::new();
        assert!(!history.rewind(0));
    }

    #[test]
    fn token_estimate_is_chars_over_four() {
        let mut history = ConversationHistory::new();
        history.push(Turn::human("a".repeat(100)));
        history.push(Turn::assistant("b".repeat(100)));
        assert_eq!(history.estimated_tokens(), 50);
        assert!(history.should_summarize(49));
        assert!(!history.should_summarize(50));
    }

    #[test]
    fn token_estimate_truncates_partial_tokens() {
        let mut history = ConversationHistory::new();
        history.push(Turn::human("a".repeat(4003)));
        assert_eq!(history.estimated_tokens(), 1000);
        // 4003 chars sit exactly at a 1000-token threshold after
        // truncation, so the budget is not yet exceeded
        assert!(!history.should_summarize(1000));
        history.push(Turn::human("b"));
        assert!(history.should_summarize(1000));
    }

    #[test]
    fn older_turns_excludes_last_two() {
        let history = history_of(5);
        let older = history.older_turns();
        assert_eq!(older.len(), 3);
        assert_eq!(older[2].content, "msg 2");

        let short = history_of(2);
        assert!(short.older_turns().is_empty());
    }

    #[test]
    fn compress_keeps_last_two_verbatim() {
        let history = history_of(6);
        let compressed = compress(history.turns(), "the gist");
        assert_eq!(compressed.len(), 3);
        assert_eq!(
            compressed[0].content,
            "Previous conversation summary: the gist"
        );
        assert_eq!(compressed[1].content, "msg 4");
        assert_eq!(compressed[2].content, "reply 5");
    }

    #[test]
    fn compress_of_two_turns_yields_three() {
        let history = history_of(2);
        let compressed = compress(history.turns(), "tiny");
        assert_eq!(compressed.len(), 3);
        assert_eq!(compressed[1].content, "msg 0");
        assert_eq!(compressed[2].content, "reply 1");
    }
}
