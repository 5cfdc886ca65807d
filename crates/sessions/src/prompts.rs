//! Fixed instruction strings, sentinels, and prompt builders.
//!
//! Everything the model is asked to do — summarization, content
//! filtering, staged extraction, story generation — is driven from here
//! so the exact wording lives in one place. Sentinels are exact-match
//! strings embedded in free-text model output.

use sm_domain::turn::Turn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sentinels
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Exact reply from a content filter that passes the checked text.
pub const SAFE: &str = "SAFE";

/// Exact reply that ends the detail-gathering stage.
pub const DETAILS_COMPLETE: &str = "DETAILS_COMPLETE";

/// Prefix of the synthetic assistant turn produced by summarization.
pub const SUMMARY_PREFIX: &str = "Previous conversation summary: ";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat summarization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const SUMMARIZE_INSTRUCTION: &str = "Please summarize the conversation history above \
in a concise way that preserves the key information and context needed to continue \
the conversation. Focus on the most important points and decisions made.";

/// Build the single synthetic human turn sent to summarize `older` turns.
pub fn summarization_prompt(older: &[Turn]) -> String {
    let conversation: Vec<&str> = older.iter().map(|t| t.content.as_str()).collect();
    format!(
        "{SUMMARIZE_INSTRUCTION}\n\nConversation to summarize:\n{}",
        conversation.join("\n")
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Story: fixed assistant messages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Sent immediately on story-session connect.
pub const STORY_OPENING: &str = "Hi! I'm excited to create a special bedtime story. \
To get started, what's the child's name and age?";

/// Sent whenever the input safety filter rejects a message.
pub const SAFETY_APOLOGY: &str = "I apologize, but I detected some content that might \
not be appropriate for a children's story. Could you please rephrase that?";

/// Sent when the name/age stage completes.
pub fn interests_prompt(name: &str) -> String {
    format!(
        "Great! Now, tell me about {name}. What are their interests, favorite things, \
         personality traits, or any special details that would make the story more personal?"
    )
}

/// Sent when the detail-gathering stage completes.
pub const THEME_PROMPT: &str = "Wonderful! Now, what kind of story would you like? \
For example, it could be an adventure, fantasy, educational, or any other theme you \
think would resonate with your child.";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Story: content safety filters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const INPUT_FILTER_INSTRUCTION: &str = "You are a content filter for a children's \
bedtime story generator. Your task is to check if the given text contains any \
inappropriate or adult content. If it does, explain what's inappropriate. If it's \
clean, respond with 'SAFE'. Be especially careful about adult themes, violence, or \
scary content.";

/// Pre-filter applied to every inbound story message, all stages.
pub fn input_filter_turns(content: &str) -> Vec<Turn> {
    vec![
        Turn::human(INPUT_FILTER_INSTRUCTION),
        Turn::human(format!("Please check this text: {content}")),
    ]
}

const STORY_FILTER_INSTRUCTION: &str = "You are a content filter for children's \
bedtime stories. Check if this story contains any inappropriate content, is too \
scary, or has any adult themes. If it's clean, respond with 'SAFE'. If not, explain \
what needs to be changed.";

/// Post-generation filter applied to the generated story text.
pub fn story_filter_turns(story: &str) -> Vec<Turn> {
    vec![Turn::human(STORY_FILTER_INSTRUCTION), Turn::human(story)]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Story: staged extraction
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const NAME_AGE_INSTRUCTION: &str = "You are helping gather information for a \
children's bedtime story generator. Extract the child's name and age from the \
parent's response. The age must be between 4-8 years old. If you can't find both \
pieces of information or if the age is outside the range, ask for clarification. \
If you find them, respond with 'NAME: <name>, AGE: <age>'";

/// Extraction prompt for the name/age stage.
pub fn name_age_turns(content: &str) -> Vec<Turn> {
    vec![Turn::human(NAME_AGE_INSTRUCTION), Turn::human(content)]
}

/// Instruction for the first detail-gathering call.
pub fn details_first_instruction(name: &str, age: u8) -> String {
    format!(
        "You are gathering information about {name}, age {age}, for a personalized \
         bedtime story. Based on the parent's response, ask ONE follow-up question to \
         learn more about an interesting detail they mentioned. If you have enough \
         details, respond with '{DETAILS_COMPLETE}' and we'll move to theme selection."
    )
}

/// Instruction for subsequent detail-gathering calls, carrying the
/// accumulated detail text.
pub fn details_followup_instruction(name: &str, age: u8, details: &str) -> String {
    format!(
        "You are gathering information about {name}, age {age}, for a personalized \
         bedtime story. The parent has shared these details:\n\n{details}\n\n\
         Based on all responses, either ask ONE more follow-up question or respond \
         with '{DETAILS_COMPLETE}' if you have enough information to create a \
         personalized story."
    )
}

/// Pair a stage instruction with the parent's raw message.
pub fn staged_turns(instruction: String, content: &str) -> Vec<Turn> {
    vec![Turn::human(instruction), Turn::human(content)]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Story: generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The single generation instruction embedding everything collected.
pub fn generation_instruction(name: &str, age: u8, details: &str, theme: &str) -> String {
    format!(
        "You are creating a bedtime story for {name}, age {age}. \
         Here are the details about {name}:\n\n{details}\n\n\
         The requested theme is: {theme}\n\n\
         Requirements:\n\
         - Story should take 5-10 minutes for an adult to read\n\
         - Use age-appropriate vocabulary\n\
         - Include educational elements and moral lessons\n\
         - Have a clear beginning, middle, and end\n\
         - Incorporate the child's details naturally into the story\n\
         - Make the child the main character\n\
         Create an engaging, personalized story that meets these requirements."
    )
}

/// Feedback message for the single post-filter retry, quoting the
/// filter's stated issues.
pub fn retry_feedback(issues: &str) -> String {
    format!(
        "Please revise the story. The content filter found these issues:\n{issues}\n\n\
         Generate a new version addressing these concerns."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarization_prompt_joins_older_turn_contents() {
        let older = vec![Turn::human("first"), Turn::assistant("second")];
        let prompt = summarization_prompt(&older);
        assert!(prompt.contains("Conversation to summarize:\nfirst\nsecond"));
    }

    #[test]
    fn filter_turns_wrap_the_checked_text() {
        let turns = input_filter_turns("a dragon");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].content, "Please check this text: a dragon");
    }

    #[test]
    fn details_instructions_embed_profile_fields() {
        let first = details_first_instruction("Tommy", 6);
        assert!(first.contains("Tommy, age 6"));
        assert!(first.contains("DETAILS_COMPLETE"));

        let followup = details_followup_instruction("Tommy", 6, "likes trains\nloves dogs");
        assert!(followup.contains("likes trains\nloves dogs"));
    }

    #[test]
    fn generation_instruction_embeds_everything() {
        let prompt = generation_instruction("Mia", 5, "collects shells", "ocean adventure");
        assert!(prompt.contains("bedtime story for Mia, age 5"));
        assert!(prompt.contains("collects shells"));
        assert!(prompt.contains("The requested theme is: ocean adventure"));
        assert!(prompt.contains("5-10 minutes"));
    }
}
