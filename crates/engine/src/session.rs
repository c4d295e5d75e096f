//! Story session - the single owner of a timeline under edit
//!
//! The session replaces any notion of ambient global state: every core call
//! goes through an explicit `StorySession` that owns the registry, the event
//! log, and the policies. Single-threaded and synchronous; a host that wants
//! multi-writer access must put its own lock or queue in front.

use plotloom_domain::{
    Act, ActId, ConnectionPolicy, DomainError, EntityRegistry, EntityRef, InformationId, ItemId,
    LocationId, PersonId, SimMinutes, ValidationResult, WorldState,
};

use crate::causality::CausalityGraph;
use crate::log::EventLog;
use crate::replay::{self, InitialConditions, ReplayOutcome};
use crate::validator::{self, TimelineConflict, ValidatorPolicy};

/// Session-wide policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionPolicy {
    pub connection: ConnectionPolicy,
    pub validator: ValidatorPolicy,
    /// Append acts even when their preconditions fail at their start time.
    /// Off by default; authoring UIs preview legality with
    /// [`StorySession::can_execute`] instead of staging broken acts.
    pub allow_invalid: bool,
}

/// An editing session over one timeline.
pub struct StorySession {
    registry: EntityRegistry,
    log: EventLog,
    initial: InitialConditions,
    policy: SessionPolicy,
}

impl StorySession {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            registry: EntityRegistry::new(),
            log: EventLog::new(),
            initial: InitialConditions::new(),
            policy,
        }
    }

    pub fn with_registry(registry: EntityRegistry, policy: SessionPolicy) -> Self {
        Self {
            registry,
            log: EventLog::new(),
            initial: InitialConditions::new(),
            policy,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable access for attribute edits. Entity *deletion* must go through
    /// the guarded `remove_*` methods below so act references are checked.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    #[inline]
    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    // =========================================================================
    // Initial conditions
    // =========================================================================

    pub fn place_person(&mut self, person: PersonId, location: LocationId, at: SimMinutes) {
        self.initial.place_person(person, location, at);
    }

    pub fn give_item(&mut self, item: ItemId, owner: PersonId) {
        self.initial.give_item(item, owner);
    }

    pub fn place_item(&mut self, item: ItemId, location: LocationId) {
        self.initial.place_item(item, location);
    }

    pub fn grant_knowledge(&mut self, person: PersonId, information: InformationId) {
        self.initial.grant_knowledge(person, information);
    }

    // =========================================================================
    // Act authoring
    // =========================================================================

    /// Validate and append an act to the log.
    ///
    /// Referential failures (an actor or payload entity missing from the
    /// registry) are `Err` - the act can never be meaningful. Business
    /// precondition failures come back as the `ValidationResult`; the act is
    /// only appended when it passes, unless the session allows staging
    /// invalid acts.
    pub fn add_act(&mut self, act: Act) -> Result<ValidationResult, DomainError> {
        self.check_references(&act)?;
        let result = self.can_execute(&act);
        if result.is_valid() || self.policy.allow_invalid {
            tracing::info!(act_id = %act.id(), start = %act.start(), kind = act.kind().display_name(), "act appended");
            self.log.append(act);
        } else {
            tracing::debug!(act_id = %act.id(), errors = result.errors().len(), "act rejected");
        }
        Ok(result)
    }

    /// Append an act fired by the outcome of `cause`, wiring an explicit
    /// trigger edge into the causality graph.
    pub fn add_triggered_act(
        &mut self,
        act: Act,
        cause: ActId,
    ) -> Result<ValidationResult, DomainError> {
        self.check_references(&act)?;
        let result = self.can_execute(&act);
        if result.is_valid() || self.policy.allow_invalid {
            let act_id = act.id();
            self.log.append_triggered(act, cause)?;
            tracing::info!(act_id = %act_id, cause = %cause, "triggered act appended");
        }
        Ok(result)
    }

    /// Remove an act, producing a fresh log, and re-validate the timeline.
    ///
    /// Refused when trigger wiring still references the act; the caller gets
    /// the error instead of a silently corrupted graph. On success the
    /// remaining timeline's conflict list is returned so editors can refresh
    /// their diagnostics in one round trip.
    pub fn remove_act(&mut self, act: ActId) -> Result<Vec<TimelineConflict>, DomainError> {
        self.log = self.log.without_act(act)?;
        tracing::info!(act_id = %act, "act removed");
        Ok(self.validate_timeline())
    }

    /// Preview an act's legality against the state at its start time without
    /// touching the log. Used by drag-and-drop layers before a drop commits.
    pub fn can_execute(&self, act: &Act) -> ValidationResult {
        let state = self.state_at(act.start());
        act.check_preconditions(&state, &self.registry, &self.policy.connection)
    }

    fn check_references(&self, act: &Act) -> Result<(), DomainError> {
        for entity in act.affected_entities() {
            let known = match entity {
                EntityRef::Act(_) | EntityRef::Event(_) => true,
                other => self.registry.contains(other),
            };
            if !known {
                return Err(DomainError::not_found(
                    entity.class_name(),
                    entity.to_string(),
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Guarded entity deletion
    // =========================================================================

    pub fn remove_person(&mut self, person: PersonId) -> Result<(), DomainError> {
        self.ensure_unreferenced(person.into(), "person")?;
        self.registry.remove_person(person)?;
        Ok(())
    }

    pub fn remove_location(&mut self, location: LocationId) -> Result<(), DomainError> {
        self.ensure_unreferenced(location.into(), "location")?;
        self.registry.remove_location(location)?;
        Ok(())
    }

    pub fn remove_item(&mut self, item: ItemId) -> Result<(), DomainError> {
        self.ensure_unreferenced(item.into(), "item")?;
        self.registry.remove_item(item)?;
        Ok(())
    }

    pub fn remove_information(&mut self, information: InformationId) -> Result<(), DomainError> {
        self.ensure_unreferenced(information.into(), "information")?;
        self.registry.remove_information(information)?;
        Ok(())
    }

    fn ensure_unreferenced(
        &self,
        entity: EntityRef,
        entity_type: &'static str,
    ) -> Result<(), DomainError> {
        if self.log.references_entity(entity) {
            tracing::warn!(%entity, "deletion refused: entity referenced by stored acts");
            return Err(DomainError::still_referenced(
                entity_type,
                entity.to_string(),
                "stored acts in the timeline",
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The world state as of `at`. Skipped acts (preconditions failing
    /// mid-fold) are logged, not surfaced; use [`StorySession::replay_at`]
    /// for the full report.
    pub fn state_at(&self, at: SimMinutes) -> WorldState {
        let outcome = self.replay_at(at);
        if !outcome.skipped.is_empty() {
            tracing::warn!(
                at = %at,
                skipped = outcome.skipped.len(),
                "replay skipped acts with failing preconditions"
            );
        }
        outcome.state
    }

    /// The world state as of a wall-clock string (`HH:MM` or `HH:MM:SS`).
    pub fn state_at_clock(&self, clock: &str) -> Result<WorldState, DomainError> {
        Ok(self.state_at(SimMinutes::parse_clock(clock)?))
    }

    /// Full replay outcome, including the skipped-act report.
    pub fn replay_at(&self, at: SimMinutes) -> ReplayOutcome {
        replay::state_at(
            at,
            &self.log,
            &self.initial,
            &self.registry,
            &self.policy.connection,
        )
    }

    /// Rebuild the causality graph from the current log.
    pub fn causality(&self) -> CausalityGraph {
        CausalityGraph::build(&self.log)
    }

    /// Run the timeline validator over the current log.
    pub fn validate_timeline(&self) -> Vec<TimelineConflict> {
        let graph = self.causality();
        let conflicts = validator::validate(&self.log, &graph, &self.policy.validator);
        tracing::debug!(
            acts = self.log.len(),
            conflicts = conflicts.len(),
            "timeline validated"
        );
        conflicts
    }
}
