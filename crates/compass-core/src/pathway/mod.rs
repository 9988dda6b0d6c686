//! Career progression analysis.
//!
//! A five-node graph asks the model for entry, mid and senior roles, then
//! for the skills expected at each level, and finally renders the result
//! as markdown:
//!
//! ```text
//! analyze_entry_level → analyze_mid_level → analyze_senior_level
//!     → analyze_skills_progression → generate_markdown
//! ```

pub mod graph;
mod prompts;

pub use graph::{CompiledGraph, GraphError, GraphProgress, GraphResult, StateGraph, END, START};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::llm::{json, LLM};

pub const NODE_ENTRY: &str = "analyze_entry_level";
pub const NODE_MID: &str = "analyze_mid_level";
pub const NODE_SENIOR: &str = "analyze_senior_level";
pub const NODE_SKILLS: &str = "analyze_skills_progression";
pub const NODE_MARKDOWN: &str = "generate_markdown";

/// Node names in execution order.
pub const PATHWAY_NODES: [&str; 5] = [NODE_ENTRY, NODE_MID, NODE_SENIOR, NODE_SKILLS, NODE_MARKDOWN];

/// Seniority band of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareerLevel {
    Entry,
    Mid,
    Senior,
}

impl CareerLevel {
    pub const ALL: [CareerLevel; 3] = [CareerLevel::Entry, CareerLevel::Mid, CareerLevel::Senior];

    /// Returns the next level, if any.
    pub fn next(&self) -> Option<CareerLevel> {
        match self {
            CareerLevel::Entry => Some(CareerLevel::Mid),
            CareerLevel::Mid => Some(CareerLevel::Senior),
            CareerLevel::Senior => None,
        }
    }

    /// Section heading used in the rendered pathway.
    pub fn display_name(&self) -> &'static str {
        match self {
            CareerLevel::Entry => "Entry Level",
            CareerLevel::Mid => "Mid-Career Level",
            CareerLevel::Senior => "Senior Level",
        }
    }

    /// Adjective used in prompts ("entry-level positions").
    pub fn prompt_label(&self) -> &'static str {
        match self {
            CareerLevel::Entry => "entry-level",
            CareerLevel::Mid => "mid-level",
            CareerLevel::Senior => "senior-level",
        }
    }

    /// Title shown for a role the model left untitled.
    pub fn default_title(&self) -> &'static str {
        match self {
            CareerLevel::Entry => "Entry Role",
            CareerLevel::Mid => "Mid-Level Role",
            CareerLevel::Senior => "Senior Role",
        }
    }

    pub fn node_name(&self) -> &'static str {
        match self {
            CareerLevel::Entry => NODE_ENTRY,
            CareerLevel::Mid => NODE_MID,
            CareerLevel::Senior => NODE_SENIOR,
        }
    }

    /// The single role used when the model's answer cannot be parsed.
    pub fn fallback_role(&self, career: &str) -> Role {
        let (title, duties): (String, [&str; 3]) = match self {
            CareerLevel::Entry => (
                format!("Entry-level {career}"),
                ["Learning fundamentals", "Assisting with projects", "Building core skills"],
            ),
            CareerLevel::Mid => (
                format!("Mid-level {career}"),
                ["Leading small projects", "Specialized knowledge", "Mentoring juniors"],
            ),
            CareerLevel::Senior => (
                format!("Senior {career}"),
                ["Strategic planning", "Department leadership", "High-level decision making"],
            ),
        };
        Role {
            title: Some(title),
            responsibilities: duties.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// A position at some career level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub responsibilities: Vec<String>,
}

/// Skills expected at each level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsProgression {
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub entry: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub mid: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub senior: Vec<String>,
}

impl SkillsProgression {
    pub fn fallback() -> Self {
        let list = |items: [&str; 3]| items.iter().map(|s| s.to_string()).collect();
        Self {
            entry: list(["Fundamental knowledge", "Basic technical skills", "Learning mindset"]),
            mid: list(["Advanced technical skills", "Project management", "Mentoring"]),
            senior: list(["Strategic thinking", "Leadership", "Business acumen"]),
        }
    }

    pub fn for_level(&self, level: CareerLevel) -> &[String] {
        match level {
            CareerLevel::Entry => &self.entry,
            CareerLevel::Mid => &self.mid,
            CareerLevel::Senior => &self.senior,
        }
    }
}

/// State threaded through the pathway graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareerState {
    pub career: String,
    pub entry_roles: Vec<Role>,
    pub mid_roles: Vec<Role>,
    pub senior_roles: Vec<Role>,
    pub skills: SkillsProgression,
    pub markdown: String,
}

impl CareerState {
    pub fn new(career: impl Into<String>) -> Self {
        Self {
            career: career.into(),
            ..Self::default()
        }
    }

    pub fn roles(&self, level: CareerLevel) -> &[Role] {
        match level {
            CareerLevel::Entry => &self.entry_roles,
            CareerLevel::Mid => &self.mid_roles,
            CareerLevel::Senior => &self.senior_roles,
        }
    }

    fn roles_mut(&mut self, level: CareerLevel) -> &mut Vec<Role> {
        match level {
            CareerLevel::Entry => &mut self.entry_roles,
            CareerLevel::Mid => &mut self.mid_roles,
            CareerLevel::Senior => &mut self.senior_roles,
        }
    }

    /// Renders roles, skills and advancement tips as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Career Progression Path for {}\n\n", self.career));

        for level in CareerLevel::ALL {
            md.push_str(&format!("### {}\n", level.display_name()));

            for role in self.roles(level) {
                let title = role.title.as_deref().unwrap_or(level.default_title());
                md.push_str(&format!("**{}**\n", title));
                if !role.responsibilities.is_empty() {
                    md.push_str("Responsibilities:\n");
                    for duty in &role.responsibilities {
                        md.push_str(&format!("- {}\n", duty));
                    }
                }
                md.push('\n');
            }

            let skills = self.skills.for_level(level);
            if !skills.is_empty() {
                md.push_str("**Key Skills at This Level:**\n");
                for skill in skills {
                    md.push_str(&format!("- {}\n", skill));
                }
                md.push('\n');
            }
        }

        md.push_str("### Tips for Advancement\n");
        md.push_str("1. **Continuous Learning**: Stay updated with industry trends and technologies\n");
        md.push_str(&format!(
            "2. **Networking**: Connect with other professionals in {}\n",
            self.career
        ));
        md.push_str("3. **Projects**: Build a portfolio of successful projects and achievements\n");
        md.push_str("4. **Mentorship**: Find mentors and become a mentor as you advance\n");
        md.push_str("5. **Certifications**: Obtain relevant certifications to validate your expertise\n");

        md
    }
}

async fn analyze_level<L: LLM + ?Sized>(
    llm: &L,
    level: CareerLevel,
    mut state: CareerState,
) -> GraphResult<CareerState> {
    let prompt = prompts::build_level_prompt(&state.career, level);
    let reply = llm
        .complete_with_system(prompts::ANALYST_SYSTEM_PROMPT, &prompt)
        .await
        .map_err(|e| GraphError::node(level.node_name(), e))?;

    let career = state.career.clone();
    let roles: Vec<Role> = json::parse_array_or(&reply, || vec![level.fallback_role(&career)]);
    *state.roles_mut(level) = roles;
    Ok(state)
}

async fn analyze_skills<L: LLM + ?Sized>(llm: &L, mut state: CareerState) -> GraphResult<CareerState> {
    let prompt = prompts::build_skills_prompt(&state.career);
    let reply = llm
        .complete_with_system(prompts::SKILLS_SYSTEM_PROMPT, &prompt)
        .await
        .map_err(|e| GraphError::node(NODE_SKILLS, e))?;

    state.skills = json::parse_object_or(&reply, SkillsProgression::fallback);
    Ok(state)
}

/// Wires the five pathway nodes.
pub fn build_pathway_graph<L: LLM + ?Sized + 'static>(
    llm: Arc<L>,
) -> Result<CompiledGraph<CareerState>, GraphError> {
    let mut graph = StateGraph::new();

    for level in CareerLevel::ALL {
        let llm = Arc::clone(&llm);
        graph.add_node(level.node_name(), move |state| {
            let llm = Arc::clone(&llm);
            async move { analyze_level(llm.as_ref(), level, state).await }
        });
    }

    let skills_llm = Arc::clone(&llm);
    graph.add_node(NODE_SKILLS, move |state| {
        let llm = Arc::clone(&skills_llm);
        async move { analyze_skills(llm.as_ref(), state).await }
    });

    graph.add_node(NODE_MARKDOWN, |mut state: CareerState| async move {
        state.markdown = state.to_markdown();
        Ok(state)
    });

    graph
        .set_entry_point(NODE_ENTRY)
        .add_edge(NODE_ENTRY, NODE_MID)
        .add_edge(NODE_MID, NODE_SENIOR)
        .add_edge(NODE_SENIOR, NODE_SKILLS)
        .add_edge(NODE_SKILLS, NODE_MARKDOWN)
        .set_finish_point(NODE_MARKDOWN);

    graph.compile()
}

/// Outcome of [`generate_pathway`].
#[derive(Debug, Clone, PartialEq)]
pub struct CareerPathway {
    pub state: CareerState,
    /// False when the graph failed and `markdown` holds the apology text.
    pub complete: bool,
    pub markdown: String,
}

impl CareerPathway {
    fn unavailable(career: &str) -> Self {
        Self {
            state: CareerState::new(career),
            complete: false,
            markdown: fallback_markdown(career),
        }
    }

    /// Entry→mid and mid→senior transitions for flow charts.
    pub fn transitions(&self) -> PathwayLinks {
        let mut links = PathwayLinks::default();

        let titles = |level: CareerLevel, prefix: &str| -> Vec<String> {
            self.state
                .roles(level)
                .iter()
                .enumerate()
                .map(|(i, role)| role.title.clone().unwrap_or_else(|| format!("{prefix} {}", i + 1)))
                .collect()
        };
        let entry = titles(CareerLevel::Entry, "Entry Role");
        let mid = titles(CareerLevel::Mid, "Mid Role");
        let senior = titles(CareerLevel::Senior, "Senior Role");

        for (sources, targets) in [(&entry, &mid), (&mid, &senior)] {
            for source in sources {
                let from = links.label_index(source);
                for target in targets {
                    let to = links.label_index(target);
                    links.links.push((from, to));
                }
            }
        }

        links
    }
}

/// Deduplicated role labels and `(source, target)` index pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathwayLinks {
    pub labels: Vec<String>,
    pub links: Vec<(usize, usize)>,
}

impl PathwayLinks {
    fn label_index(&mut self, label: &str) -> usize {
        match self.labels.iter().position(|l| l == label) {
            Some(i) => i,
            None => {
                self.labels.push(label.to_string());
                self.labels.len() - 1
            }
        }
    }
}

/// Markdown shown when the pathway cannot be generated.
pub fn fallback_markdown(career: &str) -> String {
    format!(
        "## Career Progression for {career}\n\nUnable to generate the full career progression graph at this time. Please try again later."
    )
}

/// Runs the pathway graph for `career`.
///
/// Node failures (the model being unreachable) yield the fallback markdown
/// rather than an error.
pub async fn generate_pathway<L: LLM + ?Sized + 'static>(
    career: &str,
    llm: Arc<L>,
    progress: Option<mpsc::UnboundedSender<GraphProgress>>,
) -> CareerPathway {
    let graph = match build_pathway_graph(llm) {
        Ok(graph) => graph,
        Err(e) => {
            tracing::error!(error = %e, "pathway.graph_invalid");
            return CareerPathway::unavailable(career);
        }
    };

    tracing::info!(career, "pathway.start");
    let state = CareerState::new(career);
    let result = match &progress {
        Some(tx) => graph.invoke_with_progress(state, tx).await,
        None => graph.invoke(state).await,
    };

    match result {
        Ok(state) => {
            let markdown = state.markdown.clone();
            CareerPathway {
                state,
                complete: true,
                markdown,
            }
        }
        Err(e) => {
            tracing::error!(career, error = %e, "pathway.failed");
            CareerPathway::unavailable(career)
        }
    }
}
