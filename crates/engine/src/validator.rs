//! Timeline validation
//!
//! Two independent checks over the causality graph, run to completion and
//! merged: cycle detection (a causal loop is always a structural error) and
//! timing-conflict detection (an effect declared to start before its cause
//! has finished). The validator is a pure function over the current log and
//! graph; it never mutates either and never halts early.

use serde::{Deserialize, Serialize};

use plotloom_domain::{ActId, SimMinutes};

use crate::causality::{CausalEdgeKind, CausalityGraph};
use crate::log::EventLog;

/// The kind of structural defect found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    CircularDependency,
    TimingConflict,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CircularDependency => "CIRCULAR_DEPENDENCY",
            Self::TimingConflict => "TIMING_CONFLICT",
        }
    }
}

/// How serious a conflict is for the authoring UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    /// The timeline is causally unsound.
    Error,
    /// Suspicious but playable; worth an author's attention.
    Warning,
}

/// A structural defect in the timeline, attributed to specific acts so the
/// UI can highlight them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineConflict {
    pub kind: ConflictKind,
    pub severity: ConflictSeverity,
    pub message: String,
    pub acts: Vec<ActId>,
}

/// Tunable validation policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorPolicy {
    /// Interval length assumed for acts without an explicit duration.
    pub default_duration: SimMinutes,
}

impl Default for ValidatorPolicy {
    fn default() -> Self {
        Self {
            default_duration: SimMinutes::new(5),
        }
    }
}

/// Run every check and return the union of the conflicts found.
pub fn validate(
    log: &EventLog,
    graph: &CausalityGraph,
    policy: &ValidatorPolicy,
) -> Vec<TimelineConflict> {
    let mut conflicts = cycle_conflicts(graph);
    conflicts.extend(timing_conflicts(log, graph, policy));
    conflicts
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// DFS with an explicit stack (no native recursion, so pathological logs
/// cannot blow the call stack) and a recursion-stack coloring. Every
/// connected component is visited; each back edge into the active stack is
/// one `CIRCULAR_DEPENDENCY` conflict naming the node it re-enters.
fn cycle_conflicts(graph: &CausalityGraph) -> Vec<TimelineConflict> {
    let petgraph = graph.petgraph();
    let adjacency: Vec<Vec<_>> = petgraph
        .node_indices()
        .map(|n| petgraph.neighbors(n).collect())
        .collect();

    let mut color = vec![Color::White; petgraph.node_count()];
    let mut conflicts = Vec::new();

    for root in petgraph.node_indices() {
        if color[root.index()] != Color::White {
            continue;
        }
        let mut stack: Vec<(petgraph::graph::NodeIndex, usize)> = vec![(root, 0)];
        color[root.index()] = Color::Gray;
        while let Some(&(node, cursor)) = stack.last() {
            if let Some(&next) = adjacency[node.index()].get(cursor) {
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }
                match color[next.index()] {
                    Color::White => {
                        color[next.index()] = Color::Gray;
                        stack.push((next, 0));
                    }
                    Color::Gray => {
                        let act = petgraph[next];
                        conflicts.push(TimelineConflict {
                            kind: ConflictKind::CircularDependency,
                            severity: ConflictSeverity::Error,
                            message: format!("act {act} participates in a causal cycle"),
                            acts: vec![act],
                        });
                    }
                    Color::Black => {}
                }
            } else {
                color[node.index()] = Color::Black;
                stack.pop();
            }
        }
    }
    conflicts
}

/// For every `enables`/`triggers` edge, compare the source act's interval
/// `[start, start + duration)` with the target act's start; an effect that
/// starts before its cause has finished is flagged.
fn timing_conflicts(
    log: &EventLog,
    graph: &CausalityGraph,
    policy: &ValidatorPolicy,
) -> Vec<TimelineConflict> {
    let mut conflicts = Vec::new();
    for (from, to, edge) in graph.edges() {
        if edge.kind == CausalEdgeKind::Prevents {
            continue;
        }
        let (Some(source), Some(target)) = (log.act(from), log.act(to)) else {
            continue;
        };
        let source_end = source.end_or_default(policy.default_duration);
        if source_end > target.start() {
            conflicts.push(TimelineConflict {
                kind: ConflictKind::TimingConflict,
                severity: ConflictSeverity::Warning,
                message: format!(
                    "act {from} ends at {source_end} but its effect {to} starts at {}",
                    target.start()
                ),
                acts: vec![from, to],
            });
        }
    }
    conflicts
}
