//! Quest dependency graph.
//!
//! Edges point from a prerequisite to the quest that requires it. Quests with
//! no prerequisites hang off a sentinel root so that a breadth-first walk from
//! the root reaches every quest whose ancestry is fully recorded. Quests that
//! are only ever named as prerequisites get a dataless placeholder node; those
//! placeholders have no parents and are not reachable from the root.

use crate::error::{Result, SkillockError};
use crate::model::QuestRecord;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Key carried by the sentinel root node
pub const ROOT_KEY: &str = "root";

#[derive(Debug, Clone)]
pub struct QuestNode {
    pub key: String,
    pub data: Option<QuestRecord>,
}

impl QuestNode {
    fn placeholder(key: &str) -> Self {
        Self {
            key: key.to_string(),
            data: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.data.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct QuestGraph {
    graph: DiGraph<QuestNode, ()>,
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl Default for QuestGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestGraph {
    /// Create an empty graph holding only the root
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(QuestNode::placeholder(ROOT_KEY));
        Self {
            graph,
            index: HashMap::new(),
            root,
        }
    }

    /// Build the graph for a set of quest records.
    ///
    /// Records may arrive in any order: names are unique keys and edge
    /// insertion is idempotent, so the resulting edge set is the same.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = QuestRecord>,
    {
        let mut quests = Self::new();

        for record in records {
            let node = quests.get_or_create(&record.name);

            if record.prerequisites.is_empty() {
                quests.add_edge(quests.root, node);
            } else {
                for prerequisite in &record.prerequisites {
                    let parent = quests.get_or_create(prerequisite);
                    quests.add_edge(parent, node);
                }
            }

            quests.graph[node].data = Some(record);
        }

        info!(
            "Built quest graph: {} nodes, {} edges, {} placeholders",
            quests.graph.node_count(),
            quests.graph.edge_count(),
            quests.placeholder_count()
        );

        quests
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Return the node registered under `name`, creating a placeholder if needed
    pub fn get_or_create(&mut self, name: &str) -> NodeIndex {
        if let Some(&node) = self.index.get(name) {
            return node;
        }

        debug!("Registering node for {}", name);
        let node = self.graph.add_node(QuestNode::placeholder(name));
        self.index.insert(name.to_string(), node);
        node
    }

    /// Registry lookup, independent of reachability from the root
    pub fn get(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Insert a parent -> child edge; adding an existing edge is a no-op
    pub fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.update_edge(parent, child, ());
    }

    pub fn node(&self, node: NodeIndex) -> &QuestNode {
        &self.graph[node]
    }

    pub fn parents(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    pub fn children(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Outgoing)
    }

    /// Breadth-first walk from the root, each node yielded once
    pub fn all_nodes(&self) -> Vec<NodeIndex> {
        let mut bfs = Bfs::new(&self.graph, self.root);
        let mut nodes = Vec::with_capacity(self.graph.node_count());
        while let Some(node) = bfs.next(&self.graph) {
            nodes.push(node);
        }
        nodes
    }

    /// Resolve a quest name among the nodes reachable from the root
    pub fn find(&self, name: &str) -> Result<NodeIndex> {
        self.all_nodes()
            .into_iter()
            .find(|&node| node != self.root && self.graph[node].key == name)
            .ok_or_else(|| SkillockError::TargetNotFound(name.to_string()))
    }

    /// Names of every quest that carries a record, sorted
    pub fn quest_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .index
            .values()
            .filter(|&&node| self.graph[node].data.is_some())
            .map(|&node| self.graph[node].key.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Every edge as a (parent key, child key) pair
    pub fn edge_set(&self) -> BTreeSet<(String, String)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].key.clone(),
                    self.graph[edge.target()].key.clone(),
                )
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.index
            .values()
            .filter(|&&node| self.graph[node].is_placeholder())
            .count()
    }
}
