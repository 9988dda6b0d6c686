//! Conversational career advice.

mod prompts;

pub use prompts::{
    build_advisor_system_prompt, career_overview_question, education_requirements_question,
    market_outlook_question, ADVISOR_PERSONA,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::llm::{LLMError, StreamChunk, LLM};
use crate::profile::UserProfile;

/// Reply shown when the model cannot be reached.
pub const ADVICE_FALLBACK: &str = "I'm sorry, I encountered an error while generating career advice. Please try again or rephrase your question.";

/// Who said a line of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Assistant => "Career AI",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered chat history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, content: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The history as markdown, one bold speaker label per turn.
    pub fn to_markdown(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("**{}:** {}", turn.speaker.label(), turn.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Answers career questions in the context of a user profile.
pub struct CareerAdvisor<L: LLM> {
    llm: L,
}

impl<L: LLM> CareerAdvisor<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    /// Asks one question.
    pub async fn advise(&self, question: &str, profile: &UserProfile) -> Result<String, LLMError> {
        let system = build_advisor_system_prompt(profile);
        tracing::info!(question_chars = question.len(), "advisor.ask");
        self.llm.complete_with_system(&system, question).await
    }

    /// Asks one question, streaming the reply through `tx`.
    pub async fn advise_streaming(
        &self,
        question: &str,
        profile: &UserProfile,
        tx: mpsc::UnboundedSender<StreamChunk>,
    ) -> Result<(), LLMError> {
        let system = build_advisor_system_prompt(profile);
        self.llm.stream_complete(&system, question, tx).await
    }

    /// Records the question and the reply in `conversation`.
    ///
    /// Model failures are logged and answered with [`ADVICE_FALLBACK`].
    pub async fn respond(
        &self,
        conversation: &mut Conversation,
        question: &str,
        profile: &UserProfile,
    ) -> String {
        conversation.push(Speaker::User, question);

        let reply = match self.advise(question, profile).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "advisor.failed");
                ADVICE_FALLBACK.to_string()
            }
        };

        conversation.push(Speaker::Assistant, reply.clone());
        reply
    }

    pub async fn career_overview(&self, career: &str, profile: &UserProfile) -> Result<String, LLMError> {
        self.advise(&career_overview_question(career), profile).await
    }

    pub async fn education_requirements(&self, career: &str, profile: &UserProfile) -> Result<String, LLMError> {
        self.advise(&education_requirements_question(career), profile).await
    }

    pub async fn market_outlook(&self, industry: &str, profile: &UserProfile) -> Result<String, LLMError> {
        self.advise(&market_outlook_question(industry), profile).await
    }
}
