//! Guided bedtime-story session.
//!
//! A four-stage workflow: collect the child's name and age, gather
//! personal details across as many exchanges as needed, pick a theme,
//! then generate the story. Every inbound message passes a content
//! safety pre-filter first; the generated story passes a second filter
//! with exactly one revision attempt, after which the revised output is
//! delivered as-is.

use std::sync::Arc;

use sm_domain::error::{Error, Result};
use sm_domain::turn::Turn;
use sm_providers::{CompletionRequest, LlmGateway};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::prompts;
use crate::protocol::{InboundEvent, OutboundEvent};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Stage and profile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Workflow position. Stages only ever advance; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryStage {
    NameAge,
    Details,
    Theme,
    /// Terminal: the story has been delivered. Further messages are
    /// still safety-checked but otherwise ignored.
    Story,
}

/// Everything collected about the child across the stages.
#[derive(Debug, Clone, Default)]
pub struct StoryProfile {
    pub child_name: Option<String>,
    pub child_age: Option<u8>,
    pub child_details: Option<String>,
    pub story_theme: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// StorySession
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct StorySession {
    stage: StoryStage,
    profile: StoryProfile,
    gateway: Arc<dyn LlmGateway>,
    outbound: mpsc::Sender<OutboundEvent>,
}

impl StorySession {
    pub fn new(gateway: Arc<dyn LlmGateway>, outbound: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            stage: StoryStage::NameAge,
            profile: StoryProfile::default(),
            gateway,
            outbound,
        }
    }

    pub fn stage(&self) -> StoryStage {
        self.stage
    }

    pub fn profile(&self) -> &StoryProfile {
        &self.profile
    }

    /// Greet the client. Called once, right after the connection opens.
    pub async fn on_connect(&self) -> Result<()> {
        self.send(OutboundEvent::story_message(prompts::STORY_OPENING))
            .await
    }

    /// Handle one raw inbound payload. Only `story.message` events are
    /// meaningful here; everything else is dropped without a reply.
    pub async fn handle_raw(&mut self, raw: &str) -> Result<()> {
        match InboundEvent::parse(raw) {
            Some(InboundEvent::StoryMessage { content }) => self.handle_message(content).await,
            Some(_) | None => {
                debug!("dropping unhandled story payload");
                Ok(())
            }
        }
    }

    async fn handle_message(&mut self, content: String) -> Result<()> {
        if !self.passes_safety(&content).await? {
            warn!(stage = ?self.stage, "input rejected by safety filter");
            return self
                .send(OutboundEvent::story_message(prompts::SAFETY_APOLOGY))
                .await;
        }

        match self.stage {
            StoryStage::NameAge => self.handle_name_age(&content).await,
            StoryStage::Details => self.handle_details(&content).await,
            StoryStage::Theme => self.handle_theme(&content).await,
            StoryStage::Story => Ok(()),
        }
    }

    /// Input pre-filter. Anything other than the exact pass sentinel is
    /// a rejection.
    async fn passes_safety(&self, content: &str) -> Result<bool> {
        let request = CompletionRequest::new(prompts::input_filter_turns(content));
        let completion = self.gateway.complete(request).await?;
        Ok(completion.content == prompts::SAFE)
    }

    // ── Stage: name and age ─────────────────────────────────────────

    async fn handle_name_age(&mut self, content: &str) -> Result<()> {
        let request = CompletionRequest::new(prompts::name_age_turns(content));
        let reply = self.gateway.complete(request).await?.content;

        let Some(parsed) = reply.strip_prefix("NAME:") else {
            // Extraction asked for clarification; relay it verbatim.
            return self.send(OutboundEvent::story_message(reply)).await;
        };

        let (name_part, age_part) = parsed
            .split_once(',')
            .ok_or_else(|| Error::Other(format!("malformed name/age extraction: {reply}")))?;
        let name = name_part.trim().to_string();
        let age: u8 = age_part
            .replace("AGE:", "")
            .trim()
            .parse()
            .map_err(|_| Error::Other(format!("malformed age in extraction: {reply}")))?;

        info!(name = %name, age, "story profile started");
        let prompt = prompts::interests_prompt(&name);
        self.profile.child_name = Some(name);
        self.profile.child_age = Some(age);
        self.stage = StoryStage::Details;
        self.send(OutboundEvent::story_message(prompt)).await
    }

    // ── Stage: details ──────────────────────────────────────────────

    async fn handle_details(&mut self, content: &str) -> Result<()> {
        let name = self.profile.child_name.clone().unwrap_or_default();
        let age = self.profile.child_age.unwrap_or_default();

        let instruction = match &mut self.profile.child_details {
            None => {
                self.profile.child_details = Some(content.to_string());
                prompts::details_first_instruction(&name, age)
            }
            Some(details) => {
                details.push('\n');
                details.push_str(content);
                prompts::details_followup_instruction(&name, age, details)
            }
        };

        let request = CompletionRequest::new(prompts::staged_turns(instruction, content));
        let reply = self.gateway.complete(request).await?.content;

        if reply == prompts::DETAILS_COMPLETE {
            info!("detail gathering complete, moving to theme selection");
            self.stage = StoryStage::Theme;
            return self
                .send(OutboundEvent::story_message(prompts::THEME_PROMPT))
                .await;
        }
        self.send(OutboundEvent::story_message(reply)).await
    }

    // ── Stage: theme and generation ─────────────────────────────────

    async fn handle_theme(&mut self, content: &str) -> Result<()> {
        self.profile.story_theme = Some(content.to_string());
        self.stage = StoryStage::Story;

        let name = self.profile.child_name.clone().unwrap_or_default();
        let age = self.profile.child_age.unwrap_or_default();
        let details = self.profile.child_details.clone().unwrap_or_default();

        let instruction = prompts::generation_instruction(&name, age, &details, content);
        let story = self
            .gateway
            .complete(CompletionRequest::prompt(instruction.clone()))
            .await?
            .content;

        let story = self.filter_story(instruction, story).await?;
        info!(chars = story.chars().count(), "story delivered");
        self.send(OutboundEvent::final_story(story)).await
    }

    /// Post-generation filter with a single revision attempt. The
    /// revised story is delivered without a second check.
    async fn filter_story(&self, instruction: String, story: String) -> Result<String> {
        let request = CompletionRequest::new(prompts::story_filter_turns(&story));
        let verdict = self.gateway.complete(request).await?.content;
        if verdict == prompts::SAFE {
            return Ok(story);
        }

        warn!("generated story rejected by filter, regenerating once");
        let retry = CompletionRequest::new(vec![
            Turn::human(instruction),
            Turn::human(prompts::retry_feedback(&verdict)),
        ]);
        Ok(self.gateway.complete(retry).await?.content)
    }

    async fn send(&self, event: OutboundEvent) -> Result<()> {
        self.outbound
            .send(event)
            .await
            .map_err(|_| Error::Other("outbound channel closed".into()))
    }
}
