//! A minimal state graph: named async nodes joined by direct edges.
//!
//! Nodes take the state by value and hand back the updated state. The
//! compiled graph runs them in edge order from the entry point to the
//! finish point.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::mpsc;

/// Virtual node that precedes the entry point.
pub const START: &str = "__start__";

/// Virtual node that follows the finish point.
pub const END: &str = "__end__";

pub type GraphResult<S> = Result<S, GraphError>;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
type NodeFn<S> = Arc<dyn Fn(S) -> BoxFuture<GraphResult<S>> + Send + Sync>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    #[error("node name '{0}' is reserved")]
    ReservedName(String),

    #[error("edge refers to unknown node '{0}'")]
    UnknownNode(String),

    #[error("node '{0}' has more than one outgoing edge")]
    AmbiguousEdge(String),

    #[error("graph has no entry point")]
    MissingEntryPoint,

    #[error("graph has no finish point")]
    MissingFinishPoint,

    #[error("graph never reaches its finish point; it stops at '{0}'")]
    DeadEnd(String),

    #[error("cycle detected at node '{0}'")]
    Cycle(String),

    #[error("node '{0}' is not reachable from the entry point")]
    Unreachable(String),

    #[error("node '{node}' failed: {message}")]
    Node { node: String, message: String },
}

impl GraphError {
    pub fn node(node: impl Into<String>, err: impl std::fmt::Display) -> Self {
        GraphError::Node {
            node: node.into(),
            message: err.to_string(),
        }
    }
}

/// Execution events emitted by [`CompiledGraph::invoke_with_progress`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphProgress {
    NodeStarted(String),
    NodeFinished(String),
    NodeFailed(String),
}

/// Graph builder.
pub struct StateGraph<S> {
    nodes: Vec<(String, NodeFn<S>)>,
    edges: Vec<(String, String)>,
}

impl<S: Send + 'static> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send + 'static> StateGraph<S> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node. Name clashes are reported by [`compile`](Self::compile).
    pub fn add_node<F, Fut>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GraphResult<S>> + Send + 'static,
    {
        let func: NodeFn<S> = Arc::new(move |state| Box::pin(func(state)));
        self.nodes.push((name.into(), func));
        self
    }

    /// Adds a direct edge. Use [`START`] and [`END`] for the virtual endpoints.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    pub fn set_entry_point(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_edge(START, name)
    }

    pub fn set_finish_point(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_edge(name, END)
    }

    /// Validates the graph and fixes its execution order.
    pub fn compile(self) -> Result<CompiledGraph<S>, GraphError> {
        let mut table: HashMap<String, NodeFn<S>> = HashMap::new();
        let mut declared = Vec::with_capacity(self.nodes.len());
        for (name, func) in self.nodes {
            if name == START || name == END {
                return Err(GraphError::ReservedName(name));
            }
            if table.insert(name.clone(), func).is_some() {
                return Err(GraphError::DuplicateNode(name));
            }
            declared.push(name);
        }

        let mut next: HashMap<String, String> = HashMap::new();
        for (from, to) in self.edges {
            if from != START && !table.contains_key(&from) {
                return Err(GraphError::UnknownNode(from));
            }
            if to != END && !table.contains_key(&to) {
                return Err(GraphError::UnknownNode(to));
            }
            if next.insert(from.clone(), to).is_some() {
                return Err(GraphError::AmbiguousEdge(from));
            }
        }

        if !next.values().any(|to| to == END) {
            return Err(GraphError::MissingFinishPoint);
        }

        let mut current = next.get(START).cloned().ok_or(GraphError::MissingEntryPoint)?;
        let mut visited = HashSet::new();
        let mut order = Vec::new();

        while current != END {
            if !visited.insert(current.clone()) {
                return Err(GraphError::Cycle(current));
            }
            let func = table
                .get(&current)
                .cloned()
                .ok_or_else(|| GraphError::UnknownNode(current.clone()))?;
            let following = next
                .get(&current)
                .cloned()
                .ok_or_else(|| GraphError::DeadEnd(current.clone()))?;
            order.push((current, func));
            current = following;
        }

        if let Some(name) = declared.iter().find(|name| !visited.contains(*name)) {
            return Err(detached_error(name, &next));
        }

        Ok(CompiledGraph { order })
    }
}

/// Classifies a node the entry walk never reached: part of a loop, or just orphaned.
fn detached_error(start: &str, next: &HashMap<String, String>) -> GraphError {
    let mut seen = HashSet::new();
    let mut current = start;
    while let Some(following) = next.get(current) {
        if !seen.insert(current) {
            return GraphError::Cycle(current.to_string());
        }
        current = following.as_str();
    }
    GraphError::Unreachable(start.to_string())
}

/// A validated graph, ready to run.
pub struct CompiledGraph<S> {
    order: Vec<(String, NodeFn<S>)>,
}

impl<S: Send + 'static> CompiledGraph<S> {
    /// Node names in execution order.
    pub fn node_names(&self) -> Vec<&str> {
        self.order.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub async fn invoke(&self, state: S) -> GraphResult<S> {
        self.run(state, None).await
    }

    /// Like [`invoke`](Self::invoke), reporting each node through `progress`.
    pub async fn invoke_with_progress(
        &self,
        state: S,
        progress: &mpsc::UnboundedSender<GraphProgress>,
    ) -> GraphResult<S> {
        self.run(state, Some(progress)).await
    }

    async fn run(
        &self,
        mut state: S,
        progress: Option<&mpsc::UnboundedSender<GraphProgress>>,
    ) -> GraphResult<S> {
        let notify = |event: GraphProgress| {
            if let Some(tx) = progress {
                let _ = tx.send(event);
            }
        };

        for (name, func) in &self.order {
            notify(GraphProgress::NodeStarted(name.clone()));
            let started = Instant::now();

            match func(state).await {
                Ok(next) => {
                    tracing::debug!(
                        node = %name,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "graph.node.done"
                    );
                    notify(GraphProgress::NodeFinished(name.clone()));
                    state = next;
                }
                Err(e) => {
                    tracing::warn!(node = %name, error = %e, "graph.node.failed");
                    notify(GraphProgress::NodeFailed(name.clone()));
                    return Err(e);
                }
            }
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_graph() -> StateGraph<Vec<&'static str>> {
        let mut graph = StateGraph::new();
        graph
            .add_node("first", |mut s: Vec<&'static str>| async move {
                s.push("first");
                Ok(s)
            })
            .add_node("second", |mut s: Vec<&'static str>| async move {
                s.push("second");
                Ok(s)
            });
        graph
    }

    #[tokio::test]
    async fn test_runs_in_edge_order() {
        let mut graph = counter_graph();
        graph
            .add_edge("second", "first")
            .set_entry_point("second")
            .set_finish_point("first");

        let compiled = graph.compile().unwrap();
        assert_eq!(compiled.node_names(), vec!["second", "first"]);
        assert_eq!(compiled.invoke(Vec::new()).await.unwrap(), vec!["second", "first"]);
    }

    #[test]
    fn test_compile_errors() {
        let mut graph = counter_graph();
        graph.set_finish_point("second");
        assert!(matches!(graph.compile(), Err(GraphError::MissingEntryPoint)));

        let mut graph = counter_graph();
        graph.set_entry_point("first").add_edge("first", "missing");
        assert!(matches!(graph.compile(), Err(GraphError::UnknownNode(n)) if n == "missing"));

        let mut graph = counter_graph();
        graph
            .set_entry_point("first")
            .add_edge("first", "second")
            .add_edge("second", "first")
            .set_finish_point("first");
        assert!(matches!(graph.compile(), Err(GraphError::AmbiguousEdge(_))));

        let mut graph = counter_graph();
        graph
            .set_entry_point("first")
            .add_edge("first", "second")
            .add_edge("second", "first");
        assert!(matches!(graph.compile(), Err(GraphError::MissingFinishPoint)));
    }

    #[test]
    fn test_compile_rejects_cycles() {
        let mut graph = counter_graph();
        graph
            .add_node("done", |s: Vec<&'static str>| async move { Ok(s) })
            .set_entry_point("first")
            .add_edge("first", "second")
            .add_edge("second", "first")
            .set_finish_point("done");
        assert!(matches!(graph.compile(), Err(GraphError::Cycle(n)) if n == "first"));

        let mut graph = counter_graph();
        graph
            .add_node("done", |s: Vec<&'static str>| async move { Ok(s) })
            .set_entry_point("done")
            .set_finish_point("done")
            .add_edge("first", "second")
            .add_edge("second", "first");
        assert!(matches!(graph.compile(), Err(GraphError::Cycle(n)) if n == "first"));
    }

    #[test]
    fn test_compile_rejects_unreachable_nodes() {
        let mut graph = counter_graph();
        graph.set_entry_point("first").set_finish_point("first");
        assert!(matches!(graph.compile(), Err(GraphError::Unreachable(n)) if n == "second"));
    }

    #[test]
    fn test_duplicate_node() {
        let mut graph = counter_graph();
        graph.add_node("first", |s: Vec<&'static str>| async move { Ok(s) });
        assert!(matches!(graph.compile(), Err(GraphError::DuplicateNode(n)) if n == "first"));
    }

    #[tokio::test]
    async fn test_progress_and_failure() {
        let mut graph = counter_graph();
        graph
            .add_node("boom", |_s: Vec<&'static str>| async move {
                Err(GraphError::node("boom", "model unavailable"))
            })
            .set_entry_point("first")
            .add_edge("first", "boom")
            .add_edge("boom", "second")
            .set_finish_point("second");

        let compiled = graph.compile().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = compiled.invoke_with_progress(Vec::new(), &tx).await;
        assert!(matches!(result, Err(GraphError::Node { node, .. }) if node == "boom"));

        drop(tx);
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                GraphProgress::NodeStarted("first".to_string()),
                GraphProgress::NodeFinished("first".to_string()),
                GraphProgress::NodeStarted("boom".to_string()),
                GraphProgress::NodeFailed("boom".to_string()),
            ]
        );
    }
}
