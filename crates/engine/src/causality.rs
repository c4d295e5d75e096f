//! Causality graph
//!
//! Derived data, recomputed from the current log; edges are never hand
//! edited. Nodes are acts, addressed through a stable index map next to a
//! petgraph arena so no node ever owns another (the dependency lists live in
//! the adjacency structure, not on the nodes).
//!
//! Edge inference:
//! - `enables` between two acts of the same actor, earlier to later - the
//!   actor's history so far.
//! - `enables` between acts of different actors whose affected-entity sets
//!   intersect, earlier to later. Strength is the Jaccard index of the two
//!   sets, scaled below explicit-trigger strength.
//! - `triggers` along explicit trigger wiring on scheduled events, strength
//!   1.0.
//!
//! Strengths are heuristic confidence values for UI emphasis only; nothing
//! here treats them as correctness.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use plotloom_domain::ActId;

use crate::log::EventLog;

/// The closed set of causal edge kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CausalEdgeKind {
    Enables,
    Triggers,
    /// Reserved: no current builder emits `prevents`, but consumers must
    /// handle it as part of the closed set.
    Prevents,
}

impl CausalEdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enables => "enables",
            Self::Triggers => "triggers",
            Self::Prevents => "prevents",
        }
    }
}

/// A derived directed relationship between two acts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalEdge {
    pub kind: CausalEdgeKind,
    /// Heuristic confidence in `0.0..=1.0`; 1.0 only for explicit triggers.
    pub strength: f64,
}

const ADJACENT_HISTORY_STRENGTH: f64 = 0.9;
const DISTANT_HISTORY_STRENGTH: f64 = 0.5;
const SHARED_ENTITY_STRENGTH_CAP: f64 = 0.8;

/// The derived act-to-act dependency graph.
#[derive(Debug, Clone)]
pub struct CausalityGraph {
    graph: DiGraph<ActId, CausalEdge>,
    index: HashMap<ActId, NodeIndex>,
}

impl CausalityGraph {
    /// Build the graph from the current log.
    ///
    /// Deterministic: the same log always yields the same nodes and edges in
    /// the same arena order.
    pub fn build(log: &EventLog) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for event in log.events() {
            let act_id = event.act().id();
            index
                .entry(act_id)
                .or_insert_with(|| graph.add_node(act_id));
        }

        let acts: Vec<_> = log.events().iter().map(|e| e.act()).collect();
        let affected: Vec<HashSet<_>> = acts
            .iter()
            .map(|a| a.affected_entities().into_iter().collect())
            .collect();

        // Same-actor history and shared-entity inference. The log is sorted,
        // so for i < j the act at i fires no later than the act at j; only
        // strictly-earlier pairs get an edge.
        for i in 0..acts.len() {
            for j in (i + 1)..acts.len() {
                if acts[i].start() >= acts[j].start() {
                    continue;
                }
                let edge = if acts[i].actor() == acts[j].actor() {
                    let adjacent = !acts[i + 1..j]
                        .iter()
                        .any(|a| a.actor() == acts[i].actor());
                    Some(CausalEdge {
                        kind: CausalEdgeKind::Enables,
                        strength: if adjacent {
                            ADJACENT_HISTORY_STRENGTH
                        } else {
                            DISTANT_HISTORY_STRENGTH
                        },
                    })
                } else {
                    let intersection = affected[i].intersection(&affected[j]).count();
                    if intersection == 0 {
                        None
                    } else {
                        let union = affected[i].union(&affected[j]).count();
                        Some(CausalEdge {
                            kind: CausalEdgeKind::Enables,
                            strength: SHARED_ENTITY_STRENGTH_CAP * intersection as f64
                                / union as f64,
                        })
                    }
                };
                if let Some(edge) = edge {
                    let from = index[&acts[i].id()];
                    let to = index[&acts[j].id()];
                    graph.add_edge(from, to, edge);
                }
            }
        }

        // Explicit trigger wiring: cause -> dispatched act, full confidence.
        for event in log.events() {
            if let Some(cause) = event.triggered_by() {
                if let (Some(&from), Some(&to)) =
                    (index.get(&cause), index.get(&event.act().id()))
                {
                    graph.add_edge(
                        from,
                        to,
                        CausalEdge {
                            kind: CausalEdgeKind::Triggers,
                            strength: 1.0,
                        },
                    );
                }
            }
        }

        Self { graph, index }
    }

    /// Build a graph from explicit nodes and edges.
    ///
    /// The inference in [`CausalityGraph::build`] can never produce a cycle
    /// (edges always point forward in time); this constructor exists for
    /// diagnostics tooling and tests that need arbitrary shapes, including
    /// cyclic ones, to exercise the validator.
    pub fn from_edges(
        nodes: impl IntoIterator<Item = ActId>,
        edges: impl IntoIterator<Item = (ActId, ActId, CausalEdge)>,
    ) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for node in nodes {
            index.entry(node).or_insert_with(|| graph.add_node(node));
        }
        for (from, to, edge) in edges {
            let from = *index.entry(from).or_insert_with(|| graph.add_node(from));
            let to = *index.entry(to).or_insert_with(|| graph.add_node(to));
            graph.add_edge(from, to, edge);
        }
        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, act: ActId) -> bool {
        self.index.contains_key(&act)
    }

    /// All edges as `(from, to, edge)` triples, in arena order.
    pub fn edges(&self) -> impl Iterator<Item = (ActId, ActId, &CausalEdge)> {
        self.graph.edge_indices().map(move |e| {
            let (from, to) = self
                .graph
                .edge_endpoints(e)
                .unwrap_or_else(|| unreachable!("edge index from this graph"));
            (self.graph[from], self.graph[to], &self.graph[e])
        })
    }

    /// Every ancestor of the act: the acts whose outcomes feed into it.
    ///
    /// Reverse DFS over incoming edges with a visited set, so traversal
    /// terminates even if the graph (incorrectly) contains a cycle. Output is
    /// discovery order, excluding the act itself.
    pub fn causal_chain(&self, target: ActId) -> Vec<ActId> {
        self.reachable(target, Direction::Incoming)
    }

    /// Every descendant of the act: everything its outcome feeds into.
    pub fn effects(&self, source: ActId) -> Vec<ActId> {
        self.reachable(source, Direction::Outgoing)
    }

    fn reachable(&self, from: ActId, direction: Direction) -> Vec<ActId> {
        let Some(&start) = self.index.get(&from) else {
            return Vec::new();
        };
        let mut visited = HashSet::from([start]);
        let mut stack = vec![start];
        let mut found = Vec::new();
        while let Some(node) = stack.pop() {
            for next in self.graph.neighbors_directed(node, direction) {
                if visited.insert(next) {
                    found.push(self.graph[next]);
                    stack.push(next);
                }
            }
        }
        found
    }

    pub(crate) fn petgraph(&self) -> &DiGraph<ActId, CausalEdge> {
        &self.graph
    }
}
