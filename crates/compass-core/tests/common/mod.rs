//! Canned LLM shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use compass_core::{LLMError, LLM};

type Reply = Box<dyn Fn(&str) -> Result<String, LLMError> + Send + Sync>;

/// Answers each prompt through `reply` and records what it was asked.
pub struct ScriptedLLM {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
    systems: Mutex<Vec<String>>,
}

impl ScriptedLLM {
    pub fn new(reply: impl Fn(&str) -> Result<String, LLMError> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            prompts: Mutex::new(Vec::new()),
            systems: Mutex::new(Vec::new()),
        }
    }

    /// Returns `text` for every prompt.
    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Fails every call with a network error.
    pub fn offline() -> Self {
        Self::new(|_| Err(LLMError::Network("connection refused".to_string())))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn systems(&self) -> Vec<String> {
        self.systems.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)(prompt)
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        self.systems.lock().unwrap().push(system.to_string());
        self.complete(prompt).await
    }
}
