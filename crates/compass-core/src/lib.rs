pub mod advisor;
pub mod assessment;
pub mod config;
pub mod insights;
pub mod jobs;
pub mod llm;
pub mod manifest;
pub mod pathway;
pub mod profile;
pub mod search;
pub mod storage;
pub mod tracker;

pub use advisor::{CareerAdvisor, Conversation, ADVICE_FALLBACK};
pub use assessment::{match_careers, CareerMatch, TraitSelection};
pub use config::Config;
pub use jobs::{JobDetails, JobListing, JobSearch};
pub use llm::{LLMError, Provider, LLM};
pub use manifest::Manifest;
pub use pathway::{generate_pathway, CareerPathway};
pub use profile::UserProfile;
pub use search::{DuckDuckGo, WebSearch};
pub use storage::{FileStorage, Storage};
pub use tracker::{Application, ApplicationStatus, ApplicationTracker};
