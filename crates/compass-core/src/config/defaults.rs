//! Default values for Career Compass configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider.
pub const DEFAULT_LLM_PROVIDER: &str = "groq";

/// Default max tokens for LLM responses.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

// Groq defaults
/// Default Groq API URL (OpenAI-compatible).
pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1";
/// Default Groq model.
pub const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

// ============================================================================
// Search Defaults
// ============================================================================

/// DuckDuckGo HTML endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Default number of job listings returned by a search.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Number of results consulted when looking for alternate job sources.
pub const DEFAULT_ALTERNATE_RESULTS: usize = 3;

/// Search request timeout in seconds.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// Scraper Defaults
// ============================================================================

/// Job page fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Alternate source fetch timeout in seconds.
pub const DEFAULT_ALTERNATE_TIMEOUT_SECS: u64 = 10;

/// Maximum characters of page text kept on job details.
pub const DEFAULT_FULL_TEXT_LIMIT: usize = 5000;

/// Characters of page text used when no description section is found.
pub const DEFAULT_DESCRIPTION_PREVIEW: usize = 500;

/// Browser user agents rotated when a job page refuses a request.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:90.0) Gecko/20100101 Firefox/90.0",
];

// ============================================================================
// Registry Defaults
// ============================================================================

/// Package index JSON API base.
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

/// Concurrent package lookups during a registry check.
pub const DEFAULT_REGISTRY_CONCURRENCY: usize = 8;

/// Registry request timeout in seconds.
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 20;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = ".compass";

/// Default applications subdirectory.
pub const DEFAULT_APPLICATIONS_DIR: &str = "applications";

/// Default reports subdirectory.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

// ============================================================================
// Logging Defaults
// ============================================================================

/// Application name used for log file names and the default log directory.
pub const DEFAULT_APP_NAME: &str = "career-compass";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log encoding.
pub const DEFAULT_LOG_FORMAT: &str = "text";

// ============================================================================
// Manifest Defaults
// ============================================================================

/// Manifest file name looked up when no path is given.
pub const DEFAULT_MANIFEST_FILE: &str = "requirements.txt";

/// Runtime name recognized in manifest comments.
pub const DEFAULT_RUNTIME_NAME: &str = "python";

// ============================================================================
// Matching Defaults
// ============================================================================

/// Number of careers returned by personality matching.
pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Placeholder used when a profile field is missing.
pub const NOT_SPECIFIED: &str = "Not specified";
