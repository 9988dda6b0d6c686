use crate::config::{
    LLMConfig,
    DEFAULT_GROQ_MODEL, DEFAULT_GROQ_URL,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_OPENAI_MODEL,
};
use super::{LLMError, OpenAIClient, LLM};

/// Sampling options shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// LLM Provider configuration.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Groq cloud (default)
    Groq {
        base_url: String,
        api_key: Option<String>,
        model: Option<String>,
        sampling: Sampling,
    },
    /// OpenAI
    OpenAI {
        base_url: String,
        api_key: Option<String>,
        model: Option<String>,
        sampling: Sampling,
    },
    /// Any OpenAI-compatible endpoint
    Compatible {
        base_url: String,
        api_key: Option<String>,
        model: String,
        sampling: Sampling,
    },
    /// Local Ollama instance
    Ollama {
        base_url: Option<String>,
        model: String,
        sampling: Sampling,
    },
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Groq {
            base_url: DEFAULT_GROQ_URL.to_string(),
            api_key: None,
            model: None,
            sampling: Sampling::default(),
        }
    }
}

impl Provider {
    /// Creates a provider from LLMConfig.
    pub fn from_config(config: &LLMConfig) -> Result<Self, LLMError> {
        let sampling = Sampling {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        match config.provider.to_lowercase().as_str() {
            "groq" => Ok(Provider::Groq {
                base_url: config.base_url_or_default(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                sampling,
            }),
            "openai" => Ok(Provider::OpenAI {
                base_url: config.base_url_or_default(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                sampling,
            }),
            "openai-compatible" | "compatible" => Ok(Provider::Compatible {
                base_url: config.base_url_or_default(),
                api_key: config.api_key.clone(),
                model: config.model_or_default(),
                sampling,
            }),
            "ollama" => Ok(Provider::Ollama {
                base_url: config.base_url.clone(),
                model: config.model.clone().unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                sampling,
            }),
            other => Err(LLMError::UnknownProvider(other.to_string())),
        }
    }

    /// Creates an LLM client from the provider configuration.
    pub fn build(self) -> Result<Box<dyn LLM>, LLMError> {
        let (client, sampling) = match self {
            Provider::Groq { base_url, api_key, model, sampling } => {
                let key = api_key
                    .or_else(|| std::env::var("COMPASS_LLM_API_KEY").ok())
                    .or_else(|| std::env::var("GROQ_API_KEY").ok())
                    .unwrap_or_default();

                if key.is_empty() {
                    tracing::warn!("GROQ_API_KEY not set; requests to Groq will be rejected");
                }

                let mdl = model.unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());
                (OpenAIClient::new(base_url, key, mdl), sampling)
            }

            Provider::OpenAI { base_url, api_key, model, sampling } => {
                let key = api_key
                    .or_else(|| std::env::var("COMPASS_LLM_API_KEY").ok())
                    .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                    .ok_or(LLMError::MissingApiKey)?;

                let mdl = model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
                (OpenAIClient::new(base_url, key, mdl), sampling)
            }

            Provider::Compatible { base_url, api_key, model, sampling } => {
                let key = api_key
                    .or_else(|| std::env::var("COMPASS_LLM_API_KEY").ok())
                    .unwrap_or_default();
                (OpenAIClient::new(base_url, key, model), sampling)
            }

            Provider::Ollama { base_url, model, sampling } => {
                let base = base_url
                    .or_else(|| {
                        std::env::var("OLLAMA_HOST")
                            .ok()
                            .map(|h| format!("{}/v1", h.trim_end_matches('/')))
                    })
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

                (OpenAIClient::new(base, "", model), sampling)
            }
        };

        Ok(Box::new(
            client
                .with_max_tokens(sampling.max_tokens)
                .with_temperature(sampling.temperature),
        ))
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Groq { .. } => "groq",
            Provider::OpenAI { .. } => "openai",
            Provider::Compatible { .. } => "openai-compatible",
            Provider::Ollama { .. } => "ollama",
        }
    }
}
