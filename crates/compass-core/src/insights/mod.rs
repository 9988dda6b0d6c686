//! Model-backed career insights: resume feedback, cover letters, learning
//! plans, company culture and career comparisons.
//!
//! Every operation sends one system and one user prompt. Replies are
//! expected to carry JSON; when they don't, a fixed fallback is returned so
//! callers always get something to render. Transport failures are returned
//! as [`LLMError`](crate::llm::LLMError).

mod compare;
mod culture;
mod learning;
mod prompts;
mod resume;

pub use compare::{compare_careers, comparison_to_markdown, CareerComparison};
pub use culture::{company_culture, CompanyCulture, SYNTHESIZED_NOTE};
pub use learning::{create_learning_plan, Course, LearningPlan};
pub use resume::{analyze_resume, generate_cover_letter, PersonalInfo, ResumeAnalysis};
