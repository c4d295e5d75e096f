//! Acts - authored state-changing operations
//!
//! Every act follows the same contract: a pure precondition check that
//! enumerates *all* violated rules, a pure postcondition application that
//! produces a fresh [`WorldState`], and an affected-entity listing consumed
//! by the causality graph builder and UI highlighting.
//!
//! The kinds form a closed tagged union; every `match` on [`ActKind`] is
//! exhaustive so adding a variant fails to compile until every site handles
//! it.

mod postconditions;
mod preconditions;

use serde::{Deserialize, Serialize};

use crate::entities::EntityRegistry;
use crate::ids::{ActId, EntityRef, InformationId, ItemId, LocationId, PersonId};
use crate::sim_time::SimMinutes;
use crate::validation::ValidationResult;
use crate::world_state::WorldState;

/// Whether `Move` acts require an edge in the location graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPolicy {
    pub require_connection: bool,
}

impl ConnectionPolicy {
    /// Moves must follow authored connections.
    pub fn enforced() -> Self {
        Self {
            require_connection: true,
        }
    }

    /// Any location is reachable from any other (early drafting mode).
    pub fn permissive() -> Self {
        Self {
            require_connection: false,
        }
    }
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self::enforced()
    }
}

/// The closed set of act payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActKind {
    /// Walk from one location to another.
    Move { from: LocationId, to: LocationId },
    /// Hand a held item to another person at the same location.
    GiveItem { item: ItemId, to: PersonId },
    /// Pick up an item lying at the actor's location.
    TakeItem { item: ItemId },
    /// Put a held item down at the actor's location.
    PlaceItem { item: ItemId, at: LocationId },
    /// Share a piece of information with co-located recipients.
    Speak {
        to: Vec<PersonId>,
        information: InformationId,
    },
    /// Use a held (or co-located fixed) item; consumables vanish.
    UseItem { item: ItemId },
    /// Combine two held items into a pre-registered output item.
    CombineItems {
        first: ItemId,
        second: ItemId,
        output: ItemId,
    },
}

impl ActKind {
    /// Display label for log views.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "Move",
            Self::GiveItem { .. } => "Give item",
            Self::TakeItem { .. } => "Take item",
            Self::PlaceItem { .. } => "Place item",
            Self::Speak { .. } => "Speak",
            Self::UseItem { .. } => "Use item",
            Self::CombineItems { .. } => "Combine items",
        }
    }
}

/// A single authored state-changing operation.
///
/// Acts are appended to the time-ordered log and never mutated afterwards;
/// removal produces a fresh log rather than editing history in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Act {
    id: ActId,
    actor: PersonId,
    start: SimMinutes,
    /// Explicit duration; when absent the validator's default applies.
    duration: Option<SimMinutes>,
    kind: ActKind,
}

impl Act {
    pub fn new(actor: PersonId, start: SimMinutes, kind: ActKind) -> Self {
        Self {
            id: ActId::new(),
            actor,
            start,
            duration: None,
            kind,
        }
    }

    pub fn with_duration(mut self, duration: SimMinutes) -> Self {
        self.duration = Some(duration);
        self
    }

    #[inline]
    pub fn id(&self) -> ActId {
        self.id
    }

    #[inline]
    pub fn actor(&self) -> PersonId {
        self.actor
    }

    #[inline]
    pub fn start(&self) -> SimMinutes {
        self.start
    }

    #[inline]
    pub fn duration(&self) -> Option<SimMinutes> {
        self.duration
    }

    #[inline]
    pub fn kind(&self) -> &ActKind {
        &self.kind
    }

    /// End of the act's interval, falling back to the given default duration.
    pub fn end_or_default(&self, default_duration: SimMinutes) -> SimMinutes {
        self.start + self.duration.unwrap_or(default_duration)
    }

    /// Check every precondition of this act against a state.
    ///
    /// Pure and deterministic: the same state yields the same violations in
    /// the same order. Never short-circuits; callers get the complete list.
    pub fn check_preconditions(
        &self,
        state: &WorldState,
        registry: &EntityRegistry,
        policy: &ConnectionPolicy,
    ) -> ValidationResult {
        preconditions::check(self, state, registry, policy)
    }

    /// Apply this act's postconditions, producing a new snapshot.
    ///
    /// Must only be called after [`Act::check_preconditions`] passed against
    /// the same state; calling it on a failing state is a caller bug, caught
    /// in debug builds.
    pub fn apply_postconditions(
        &self,
        state: &WorldState,
        registry: &EntityRegistry,
    ) -> WorldState {
        debug_assert!(
            preconditions::check(self, state, registry, &ConnectionPolicy::permissive())
                .is_valid(),
            "apply_postconditions called for act {} on a state that fails its preconditions",
            self.id
        );
        postconditions::apply(self, state, registry)
    }

    /// The actor plus every entity referenced in the payload.
    ///
    /// Order is actor first, then payload declaration order; duplicates are
    /// dropped (a Speak that lists the actor as recipient names them once).
    pub fn affected_entities(&self) -> Vec<EntityRef> {
        let mut refs: Vec<EntityRef> = vec![self.actor.into()];
        match &self.kind {
            ActKind::Move { from, to } => {
                refs.push((*from).into());
                refs.push((*to).into());
            }
            ActKind::GiveItem { item, to } => {
                refs.push((*item).into());
                refs.push((*to).into());
            }
            ActKind::TakeItem { item } => {
                refs.push((*item).into());
            }
            ActKind::PlaceItem { item, at } => {
                refs.push((*item).into());
                refs.push((*at).into());
            }
            ActKind::Speak { to, information } => {
                for recipient in to {
                    refs.push((*recipient).into());
                }
                refs.push((*information).into());
            }
            ActKind::UseItem { item } => {
                refs.push((*item).into());
            }
            ActKind::CombineItems {
                first,
                second,
                output,
            } => {
                refs.push((*first).into());
                refs.push((*second).into());
                refs.push((*output).into());
            }
        }
        let mut seen = std::collections::HashSet::new();
        refs.retain(|r| seen.insert(*r));
        refs
    }
}
