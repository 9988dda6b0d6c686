mod common;

use std::sync::Arc;

use common::ScriptedLLM;
use compass_core::pathway::{
    fallback_markdown, GraphProgress, NODE_ENTRY, NODE_MARKDOWN, NODE_MID, PATHWAY_NODES,
};
use compass_core::generate_pathway;
use tokio::sync::mpsc;

fn career_llm() -> ScriptedLLM {
    ScriptedLLM::new(|prompt| {
        let reply = if prompt.contains("entry-level positions") {
            r#"```json
[{"title": "Junior Data Analyst", "responsibilities": ["Clean datasets", "Build dashboards"]}]
```"#
        } else if prompt.contains("mid-level positions") {
            r#"Here you go: [{"title": "Data Scientist", "responsibilities": "Train models"}]"#
        } else if prompt.contains("senior-level positions") {
            r#"[{"title": "Lead Data Scientist", "responsibilities": ["Set direction"]},
                {"title": "Head of Analytics", "responsibilities": []}]"#
        } else {
            r#"{"entry": ["SQL", "Excel"], "mid": ["Machine learning"], "senior": "Strategy"}"#
        };
        Ok(reply.to_string())
    })
}

#[tokio::test]
async fn test_generate_pathway() {
    let llm = Arc::new(career_llm());
    let pathway = generate_pathway("Data Science", Arc::clone(&llm), None).await;

    assert!(pathway.complete);
    assert_eq!(pathway.state.entry_roles[0].title.as_deref(), Some("Junior Data Analyst"));
    assert_eq!(pathway.state.mid_roles[0].responsibilities, vec!["Train models"]);
    assert_eq!(pathway.state.senior_roles.len(), 2);
    assert_eq!(pathway.state.skills.senior, vec!["Strategy"]);

    let md = &pathway.markdown;
    assert!(md.starts_with("## Career Progression Path for Data Science"));
    assert!(md.contains("**Junior Data Analyst**"));
    assert!(md.contains("- Build dashboards"));
    assert!(md.contains("**Key Skills at This Level:**\n- SQL\n- Excel"));
    assert!(md.contains("2. **Networking**: Connect with other professionals in Data Science"));

    // Three level prompts and one skills prompt, in graph order.
    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 4);
    assert!(prompts[0].contains("entry-level"));
    assert!(prompts[3].contains("'entry', 'mid', and 'senior' keys"));
}

#[tokio::test]
async fn test_unparseable_replies_use_fallbacks() {
    let llm = Arc::new(ScriptedLLM::always("I'd rather not answer in JSON."));
    let pathway = generate_pathway("Nursing", llm, None).await;

    assert!(pathway.complete);
    assert_eq!(pathway.state.entry_roles.len(), 1);
    assert!(!pathway.state.skills.entry.is_empty());
    assert!(pathway.markdown.contains("Career Progression Path for Nursing"));
}

#[tokio::test]
async fn test_offline_model_yields_fallback_markdown() {
    let llm = Arc::new(ScriptedLLM::offline());
    let pathway = generate_pathway("Nursing", llm, None).await;

    assert!(!pathway.complete);
    assert_eq!(pathway.markdown, fallback_markdown("Nursing"));
    assert!(pathway.markdown.contains("Unable to generate the full career progression graph"));
}

#[tokio::test]
async fn test_progress_events() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pathway = generate_pathway("Data Science", Arc::new(career_llm()), Some(tx)).await;
    assert!(pathway.complete);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert_eq!(events.len(), PATHWAY_NODES.len() * 2);
    assert_eq!(events[0], GraphProgress::NodeStarted(NODE_ENTRY.to_string()));
    assert_eq!(events[1], GraphProgress::NodeFinished(NODE_ENTRY.to_string()));
    assert_eq!(events.last(), Some(&GraphProgress::NodeFinished(NODE_MARKDOWN.to_string())));
}

#[tokio::test]
async fn test_progress_reports_failed_node() {
    let llm = ScriptedLLM::new(|prompt| {
        if prompt.contains("mid-level") {
            Err(compass_core::LLMError::RateLimited)
        } else {
            Ok("[]".to_string())
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pathway = generate_pathway("Law", Arc::new(llm), Some(tx)).await;
    assert!(!pathway.complete);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.last(), Some(&GraphProgress::NodeFailed(NODE_MID.to_string())));
}

#[tokio::test]
async fn test_transitions_link_adjacent_levels() {
    let pathway = generate_pathway("Data Science", Arc::new(career_llm()), None).await;
    let links = pathway.transitions();

    assert_eq!(
        links.labels,
        vec!["Junior Data Analyst", "Data Scientist", "Lead Data Scientist", "Head of Analytics"]
    );
    assert_eq!(links.links, vec![(0, 1), (1, 2), (1, 3)]);
}
