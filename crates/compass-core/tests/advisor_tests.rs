mod common;

use common::ScriptedLLM;
use compass_core::advisor::{Speaker, ADVISOR_PERSONA};
use compass_core::profile::{EducationLevel, ExperienceLevel};
use compass_core::{CareerAdvisor, Conversation, UserProfile, ADVICE_FALLBACK};
use tokio::sync::mpsc;

fn profile() -> UserProfile {
    UserProfile {
        education: Some(EducationLevel::Bachelor),
        experience: Some(ExperienceLevel::OneToThree),
        interests: vec!["Healthcare".to_string()],
        selected_career: Some("Nurse Practitioner".to_string()),
    }
}

#[tokio::test]
async fn test_advice_carries_profile_context() {
    let advisor = CareerAdvisor::new(ScriptedLLM::always("Consider a BSN bridge program."));

    let reply = advisor.advise("How do I become an NP?", &profile()).await.unwrap();

    assert_eq!(reply, "Consider a BSN bridge program.");
    let system = &advisor.llm().systems()[0];
    assert!(system.starts_with(ADVISOR_PERSONA));
    assert!(system.contains("- Interests: Healthcare"));
    assert!(system.contains("- Career Interest: Nurse Practitioner"));
}

#[tokio::test]
async fn test_respond_records_both_turns() {
    let advisor = CareerAdvisor::new(ScriptedLLM::always("Start with a nursing degree."));
    let mut conversation = Conversation::new();

    let reply = advisor
        .respond(&mut conversation, "Where do I start?", &UserProfile::default())
        .await;

    assert_eq!(reply, "Start with a nursing degree.");
    let turns = conversation.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].speaker, Speaker::User);
    assert_eq!(turns[1].content, "Start with a nursing degree.");
    assert_eq!(
        conversation.to_markdown(),
        "**You:** Where do I start?\n\n**Career AI:** Start with a nursing degree."
    );

    conversation.clear();
    assert!(conversation.is_empty());
}

#[tokio::test]
async fn test_respond_falls_back_when_offline() {
    let advisor = CareerAdvisor::new(ScriptedLLM::offline());
    let mut conversation = Conversation::new();

    let reply = advisor
        .respond(&mut conversation, "Is nursing stable?", &profile())
        .await;

    assert_eq!(reply, ADVICE_FALLBACK);
    assert_eq!(conversation.turns()[1].content, ADVICE_FALLBACK);
}

#[tokio::test]
async fn test_quick_questions() {
    let advisor = CareerAdvisor::new(ScriptedLLM::always("ok"));
    let profile = UserProfile::default();

    advisor.career_overview("Data Science", &profile).await.unwrap();
    advisor.education_requirements("Law", &profile).await.unwrap();
    advisor.market_outlook("Renewable Energy", &profile).await.unwrap();

    let prompts = advisor.llm().prompts();
    assert!(prompts[0].contains("overview of a career in Data Science"));
    assert!(prompts[1].contains("certifications are typically needed for a career in Law"));
    assert!(prompts[2].contains("the Renewable Energy industry over the next 5 years"));
}

#[tokio::test]
async fn test_streaming_falls_back_to_single_chunk() {
    let advisor = CareerAdvisor::new(ScriptedLLM::always("Whole answer"));
    let (tx, mut rx) = mpsc::unbounded_channel();

    advisor
        .advise_streaming("Should I learn SQL?", &profile(), tx)
        .await
        .unwrap();

    let first = rx.recv().await.unwrap();
    assert_eq!(first.text, "Whole answer");
    assert!(!first.is_final);
    assert!(rx.recv().await.unwrap().is_final);
    assert!(rx.recv().await.is_none());
}
