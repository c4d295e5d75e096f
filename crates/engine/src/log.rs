//! The append-only event log
//!
//! Events are kept sorted by firing time. Two events may share a timestamp;
//! the tie-break is insertion order within the log. That stable ordering is
//! an explicit policy (later-inserted wins on replay), not an accident, and
//! it is covered by tests.

use serde::{Deserialize, Serialize};

use plotloom_domain::{Act, ActId, DomainError, EntityRef, EventId, SimMinutes};

/// A scheduled firing of an act at a specific time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEvent {
    id: EventId,
    at: SimMinutes,
    act: Act,
    /// The act whose outcome explicitly caused this event to fire, if any.
    triggered_by: Option<ActId>,
}

impl ScheduledEvent {
    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[inline]
    pub fn at(&self) -> SimMinutes {
        self.at
    }

    #[inline]
    pub fn act(&self) -> &Act {
        &self.act
    }

    #[inline]
    pub fn triggered_by(&self) -> Option<ActId> {
        self.triggered_by
    }
}

/// Time-ordered log of scheduled events.
///
/// Single-owner, synchronous: the editing session owns the log and mutates
/// it through [`EventLog::append`] / [`EventLog::without_act`]. Removal never
/// edits history in place; it produces a fresh log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    events: Vec<ScheduledEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an act to fire at its start time.
    ///
    /// The event is inserted after every event with an earlier-or-equal time,
    /// which keeps the log sorted and preserves insertion order among ties.
    pub fn append(&mut self, act: Act) -> EventId {
        self.insert(act, None)
    }

    /// Schedule an act fired by the outcome of `cause`.
    pub fn append_triggered(&mut self, act: Act, cause: ActId) -> Result<EventId, DomainError> {
        if !self.contains_act(cause) {
            return Err(DomainError::not_found("act", cause.to_string()));
        }
        Ok(self.insert(act, Some(cause)))
    }

    fn insert(&mut self, act: Act, triggered_by: Option<ActId>) -> EventId {
        let event = ScheduledEvent {
            id: EventId::new(),
            at: act.start(),
            act,
            triggered_by,
        };
        let id = event.id;
        let position = self.events.partition_point(|e| e.at <= event.at);
        self.events.insert(position, event);
        id
    }

    /// Produce a fresh log without the given act.
    ///
    /// Refused when another event's trigger wiring references the act; a
    /// removal that leaves dangling references is surfaced as an error, never
    /// applied silently.
    pub fn without_act(&self, act: ActId) -> Result<EventLog, DomainError> {
        if !self.contains_act(act) {
            return Err(DomainError::not_found("act", act.to_string()));
        }
        if let Some(dependent) = self
            .events
            .iter()
            .find(|e| e.triggered_by == Some(act) && e.act.id() != act)
        {
            return Err(DomainError::still_referenced(
                "act",
                act.to_string(),
                format!("event {}", dependent.id),
            ));
        }
        let events = self
            .events
            .iter()
            .filter(|e| e.act.id() != act)
            .cloned()
            .collect();
        Ok(EventLog { events })
    }

    /// Events in firing order (time, then insertion order).
    #[inline]
    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains_act(&self, act: ActId) -> bool {
        self.events.iter().any(|e| e.act.id() == act)
    }

    pub fn act(&self, id: ActId) -> Option<&Act> {
        self.events.iter().map(|e| e.act()).find(|a| a.id() == id)
    }

    /// True when any stored act's payload references the entity.
    ///
    /// Used to guard entity deletion: removing an entity an act still points
    /// at would corrupt later replay.
    pub fn references_entity(&self, entity: EntityRef) -> bool {
        self.events
            .iter()
            .any(|e| e.act.affected_entities().contains(&entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotloom_domain::{ActKind, EntityRegistry, Location, LocationId, Person};

    fn move_act(actor: plotloom_domain::PersonId, start: i64) -> Act {
        Act::new(
            actor,
            SimMinutes::new(start),
            ActKind::Move {
                from: LocationId::new(),
                to: LocationId::new(),
            },
        )
    }

    #[test]
    fn test_append_keeps_time_order() {
        let mut registry = EntityRegistry::new();
        let actor = registry.add_person(Person::new("Alice"));
        let mut log = EventLog::new();
        log.append(move_act(actor, 20));
        log.append(move_act(actor, 5));
        log.append(move_act(actor, 10));

        let times: Vec<i64> = log.events().iter().map(|e| e.at().get()).collect();
        assert_eq!(times, vec![5, 10, 20]);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let mut registry = EntityRegistry::new();
        let actor = registry.add_person(Person::new("Alice"));
        let mut log = EventLog::new();
        let first = move_act(actor, 10);
        let second = move_act(actor, 10);
        let first_id = first.id();
        let second_id = second.id();
        log.append(first);
        log.append(second);

        let order: Vec<_> = log.events().iter().map(|e| e.act().id()).collect();
        assert_eq!(order, vec![first_id, second_id]);
    }

    #[test]
    fn test_without_act_is_a_fresh_log() {
        let mut registry = EntityRegistry::new();
        let actor = registry.add_person(Person::new("Alice"));
        let mut log = EventLog::new();
        let act = move_act(actor, 10);
        let act_id = act.id();
        log.append(act);

        let trimmed = log.without_act(act_id).expect("act exists");
        assert!(trimmed.is_empty());
        // The original log is untouched.
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_without_act_refuses_dangling_trigger() {
        let mut registry = EntityRegistry::new();
        let actor = registry.add_person(Person::new("Alice"));
        let mut log = EventLog::new();
        let cause = move_act(actor, 10);
        let cause_id = cause.id();
        log.append(cause);
        log.append_triggered(move_act(actor, 20), cause_id)
            .expect("cause exists");

        assert!(matches!(
            log.without_act(cause_id),
            Err(DomainError::StillReferenced { .. })
        ));
    }

    #[test]
    fn test_append_triggered_requires_known_cause() {
        let mut registry = EntityRegistry::new();
        let actor = registry.add_person(Person::new("Alice"));
        let mut log = EventLog::new();
        assert!(log
            .append_triggered(move_act(actor, 20), ActId::new())
            .is_err());
    }

    #[test]
    fn test_references_entity() {
        let mut registry = EntityRegistry::new();
        let actor = registry.add_person(Person::new("Alice"));
        let cellar = registry.add_location(Location::new("Cellar"));
        let hall = registry.add_location(Location::new("Hall"));
        let mut log = EventLog::new();
        log.append(Act::new(
            actor,
            SimMinutes::new(10),
            ActKind::Move {
                from: cellar,
                to: hall,
            },
        ));

        assert!(log.references_entity(actor.into()));
        assert!(log.references_entity(cellar.into()));
        assert!(!log.references_entity(LocationId::new().into()));
    }
}
