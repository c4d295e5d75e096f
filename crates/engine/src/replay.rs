//! Temporal replay
//!
//! Replay is a linear fold, not an incremental index: every query re-derives
//! the snapshot from the full log. That keeps the result a pure function of
//! `(target, log, initial conditions)` with no cache to invalidate, at the
//! cost of O(events) per query. A checkpoint cache may be layered on top as
//! long as cached results stay provably equal to a full replay.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use plotloom_domain::{
    ActId, ConnectionPolicy, EntityRegistry, InformationId, ItemId, LocationId, PersonId,
    SimMinutes, WorldState,
};

use crate::log::EventLog;

/// A person's authored starting position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPosition {
    pub person: PersonId,
    pub location: LocationId,
    /// When the person arrives there; positions after the query target are
    /// ignored.
    pub at: SimMinutes,
}

/// Authored starting facts the log folds on top of.
///
/// Item custody and knowledge are start-of-simulation facts; only positions
/// carry their own timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialConditions {
    positions: Vec<InitialPosition>,
    item_owners: Vec<(ItemId, PersonId)>,
    item_locations: Vec<(ItemId, LocationId)>,
    knowledge: Vec<(PersonId, InformationId)>,
}

impl InitialConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place_person(&mut self, person: PersonId, location: LocationId, at: SimMinutes) {
        self.positions.push(InitialPosition {
            person,
            location,
            at,
        });
    }

    pub fn give_item(&mut self, item: ItemId, owner: PersonId) {
        self.item_owners.push((item, owner));
    }

    pub fn place_item(&mut self, item: ItemId, location: LocationId) {
        self.item_locations.push((item, location));
    }

    pub fn grant_knowledge(&mut self, person: PersonId, information: InformationId) {
        self.knowledge.push((person, information));
    }

    pub fn positions(&self) -> &[InitialPosition] {
        &self.positions
    }
}

/// Outcome of a replay: the snapshot plus any acts the fold had to skip.
///
/// An act is skipped when its preconditions fail against the state folded so
/// far (e.g. the author staged a Speak before the speaker learned the fact).
/// Skipped acts still occupy their log positions; they just contribute no
/// state change.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub state: WorldState,
    pub skipped: Vec<ActId>,
}

/// Reconstruct the world state as of `target`.
///
/// Initial positions with `at <= target` seed each person; events then fold
/// in ascending (time, insertion) order while `event.at <= target`, so the
/// last write for each person wins and ties resolve to the later log entry.
/// An actor's initial record anchors their timeline: an event staged before
/// the record's time cannot retroactively override the authored position, so
/// it is skipped like a precondition failure.
/// Scanning stops at the first event past the target (the log is sorted).
/// Every person in the registry appears in the result, unplaced persons with
/// `None` - callers must not conflate "unknown" with "absent".
pub fn state_at(
    target: SimMinutes,
    log: &EventLog,
    initial: &InitialConditions,
    registry: &EntityRegistry,
    policy: &ConnectionPolicy,
) -> ReplayOutcome {
    let mut state = WorldState::at(target);
    for person in registry.persons() {
        state.track_person(person.id());
    }

    let mut seed_positions = initial.positions.clone();
    seed_positions.sort_by_key(|p| p.at);
    let mut seed_times: HashMap<PersonId, SimMinutes> = HashMap::new();
    for seed in seed_positions {
        if seed.at <= target {
            state.set_position(seed.person, seed.location);
            seed_times.insert(seed.person, seed.at);
        }
    }
    for (item, owner) in &initial.item_owners {
        state.give_item_to(*item, *owner);
    }
    for (item, location) in &initial.item_locations {
        state.place_item_at(*item, *location);
    }
    for (person, information) in &initial.knowledge {
        state.learn(*person, *information);
    }

    let mut skipped = Vec::new();
    for event in log.events() {
        if event.at() > target {
            break;
        }
        let act = event.act();
        let before_seed = seed_times
            .get(&act.actor())
            .is_some_and(|&anchor| event.at() < anchor);
        if before_seed {
            skipped.push(act.id());
        } else if act.check_preconditions(&state, registry, policy).is_valid() {
            state = act.apply_postconditions(&state, registry);
        } else {
            skipped.push(act.id());
        }
    }

    ReplayOutcome { state, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotloom_domain::{Act, ActKind, Information, Location, Person};

    struct Fixture {
        registry: EntityRegistry,
        initial: InitialConditions,
        alice: PersonId,
        cellar: LocationId,
        hall: LocationId,
    }

    fn fixture() -> Fixture {
        let mut registry = EntityRegistry::new();
        let alice = registry.add_person(Person::new("Alice"));
        let cellar = registry.add_location(Location::new("Cellar"));
        let hall = registry.add_location(Location::new("Hall"));
        registry
            .connect_locations(cellar, hall)
            .expect("both exist");

        let mut initial = InitialConditions::new();
        initial.place_person(alice, cellar, SimMinutes::ZERO);

        Fixture {
            registry,
            initial,
            alice,
            cellar,
            hall,
        }
    }

    fn replay(f: &Fixture, log: &EventLog, target: i64) -> ReplayOutcome {
        state_at(
            SimMinutes::new(target),
            log,
            &f.initial,
            &f.registry,
            &ConnectionPolicy::enforced(),
        )
    }

    #[test]
    fn test_move_before_and_after() {
        let f = fixture();
        let mut log = EventLog::new();
        log.append(Act::new(
            f.alice,
            SimMinutes::new(10),
            ActKind::Move {
                from: f.cellar,
                to: f.hall,
            },
        ));

        let before = replay(&f, &log, 5);
        assert_eq!(before.state.position(f.alice), Some(f.cellar));

        let after = replay(&f, &log, 15);
        assert_eq!(after.state.position(f.alice), Some(f.hall));
        assert!(after.skipped.is_empty());
    }

    #[test]
    fn test_determinism() {
        let f = fixture();
        let mut log = EventLog::new();
        log.append(Act::new(
            f.alice,
            SimMinutes::new(10),
            ActKind::Move {
                from: f.cellar,
                to: f.hall,
            },
        ));

        assert_eq!(replay(&f, &log, 15), replay(&f, &log, 15));
    }

    #[test]
    fn test_unseen_person_reported_not_omitted() {
        let mut f = fixture();
        let ghost = f.registry.add_person(Person::new("Ghost"));
        let log = EventLog::new();

        let outcome = replay(&f, &log, 30);
        assert!(outcome.state.tracks(ghost));
        assert_eq!(outcome.state.position(ghost), None);
        assert_eq!(outcome.state.last_action(ghost), None);
    }

    #[test]
    fn test_initial_position_after_target_ignored() {
        let mut f = fixture();
        let bob = f.registry.add_person(Person::new("Bob"));
        f.initial.place_person(bob, f.hall, SimMinutes::new(60));

        let outcome = replay(&f, &EventLog::new(), 30);
        assert_eq!(outcome.state.position(bob), None);
    }

    #[test]
    fn test_event_before_initial_record_is_ignored() {
        let mut f = fixture();
        let bob = f.registry.add_person(Person::new("Bob"));
        // Bob's authored record places him in the hall at t=20; a move staged
        // at t=10 predates it and must not override the authored position.
        f.initial.place_person(bob, f.hall, SimMinutes::new(20));

        let mut log = EventLog::new();
        let premature = Act::new(
            bob,
            SimMinutes::new(10),
            ActKind::Move {
                from: f.hall,
                to: f.cellar,
            },
        );
        let premature_id = premature.id();
        log.append(premature);

        let outcome = replay(&f, &log, 30);
        assert_eq!(outcome.state.position(bob), Some(f.hall));
        assert_eq!(outcome.skipped, vec![premature_id]);
    }

    #[test]
    fn test_shared_timestamp_later_log_entry_wins() {
        let mut f = fixture();
        let attic = f.registry.add_location(Location::new("Attic"));
        f.registry
            .connect_locations(f.cellar, attic)
            .expect("both exist");
        let mut log = EventLog::new();
        // Two moves at the same minute. Both fold in insertion order, so the
        // later-inserted one's destination is what the snapshot reports.
        log.append(Act::new(
            f.alice,
            SimMinutes::new(10),
            ActKind::Move {
                from: f.cellar,
                to: f.hall,
            },
        ));
        log.append(Act::new(
            f.alice,
            SimMinutes::new(10),
            ActKind::Move {
                from: f.hall,
                to: f.cellar,
            },
        ));

        let outcome = replay(&f, &log, 10);
        assert_eq!(outcome.state.position(f.alice), Some(f.cellar));
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_precondition_failure_is_skipped_and_reported() {
        let mut f = fixture();
        let bob = f.registry.add_person(Person::new("Bob"));
        f.initial.place_person(bob, f.hall, SimMinutes::ZERO);
        let rumor = f.registry.add_information(Information::new("The vault code"));
        f.initial.grant_knowledge(f.alice, rumor);

        let mut log = EventLog::new();
        // Bob is in the hall, Alice in the cellar: the Speak cannot land.
        let doomed = Act::new(
            f.alice,
            SimMinutes::new(10),
            ActKind::Speak {
                to: vec![bob],
                information: rumor,
            },
        );
        let doomed_id = doomed.id();
        log.append(doomed);

        let outcome = replay(&f, &log, 30);
        assert_eq!(outcome.skipped, vec![doomed_id]);
        assert!(!outcome.state.knows(bob, rumor));
    }

    #[test]
    fn test_knowledge_flows_through_replay() {
        let mut f = fixture();
        let bob = f.registry.add_person(Person::new("Bob"));
        f.initial.place_person(bob, f.cellar, SimMinutes::ZERO);
        let rumor = f.registry.add_information(Information::new("The vault code"));
        f.initial.grant_knowledge(f.alice, rumor);

        let mut log = EventLog::new();
        log.append(Act::new(
            f.alice,
            SimMinutes::new(10),
            ActKind::Speak {
                to: vec![bob],
                information: rumor,
            },
        ));

        let before = replay(&f, &log, 5);
        assert!(!before.state.knows(bob, rumor));

        let after = replay(&f, &log, 10);
        assert!(after.state.knows(bob, rumor));
    }
}
