//! Plotloom engine - timeline replay, causality, and validation.
//!
//! Consumes the value types of `plotloom-domain` and exposes the editing
//! session boundary: append/remove acts, query point-in-time world states,
//! rebuild the causality graph, and validate the whole timeline. Everything
//! is synchronous and pure over in-memory data; renderers and editors sit on
//! the other side of this boundary and are never called into.

pub mod causality;
pub mod log;
pub mod replay;
pub mod session;
pub mod validator;

pub use causality::{CausalEdge, CausalEdgeKind, CausalityGraph};
pub use log::{EventLog, ScheduledEvent};
pub use replay::{InitialConditions, InitialPosition, ReplayOutcome};
pub use session::{SessionPolicy, StorySession};
pub use validator::{
    validate, ConflictKind, ConflictSeverity, TimelineConflict, ValidatorPolicy,
};
