//! End-to-end timeline scenarios exercised through the session boundary.

use plotloom_domain::{
    Act, ActKind, EntityRegistry, Information, Location, LocationId, Person, PersonId, SimMinutes,
    ViolationCode,
};
use plotloom_engine::{
    CausalEdgeKind, ConflictKind, SessionPolicy, StorySession, ValidatorPolicy,
};

struct World {
    session: StorySession,
    alice: PersonId,
    bob: PersonId,
    cellar: LocationId,
    hall: LocationId,
}

fn world() -> World {
    // RUST_LOG=debug surfaces session tracing while debugging a scenario.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut registry = EntityRegistry::new();
    let alice = registry.add_person(Person::new("Alice"));
    let bob = registry.add_person(Person::new("Bob"));
    let cellar = registry.add_location(Location::new("Cellar"));
    let hall = registry.add_location(Location::new("Hall"));
    registry
        .connect_locations(cellar, hall)
        .expect("both exist");

    let mut session = StorySession::with_registry(registry, SessionPolicy::default());
    session.place_person(alice, cellar, SimMinutes::ZERO);

    World {
        session,
        alice,
        bob,
        cellar,
        hall,
    }
}

fn move_act(w: &World, start: i64, from: LocationId, to: LocationId) -> Act {
    Act::new(w.alice, SimMinutes::new(start), ActKind::Move { from, to })
}

#[test]
fn scenario_move_splits_the_timeline() {
    let mut w = world();
    let act = move_act(&w, 10, w.cellar, w.hall);
    let result = w.session.add_act(act).expect("references are sound");
    assert!(result.is_valid());

    assert_eq!(
        w.session.state_at(SimMinutes::new(5)).position(w.alice),
        Some(w.cellar)
    );
    assert_eq!(
        w.session.state_at(SimMinutes::new(15)).position(w.alice),
        Some(w.hall)
    );
}

#[test]
fn scenario_speak_to_absent_recipient_leaves_world_unchanged() {
    let mut w = world();
    let rumor = w
        .session
        .registry_mut()
        .add_information(Information::new("The vault code"));
    w.session.grant_knowledge(w.alice, rumor);
    w.session.place_person(w.bob, w.hall, SimMinutes::ZERO);

    let speak = Act::new(
        w.alice,
        SimMinutes::new(10),
        ActKind::Speak {
            to: vec![w.bob],
            information: rumor,
        },
    );
    let result = w.session.add_act(speak).expect("references are sound");
    assert!(!result.is_valid());
    assert!(result.has_code(ViolationCode::RecipientNotPresent));

    // The act was refused, so the world is untouched at any time.
    let state = w.session.state_at(SimMinutes::new(30));
    assert!(!state.knows(w.bob, rumor));
}

#[test]
fn scenario_two_act_history_is_one_clean_edge() {
    let mut w = world();
    w.session
        .add_act(move_act(&w, 10, w.cellar, w.hall))
        .expect("references are sound");
    w.session
        .add_act(move_act(&w, 20, w.hall, w.cellar))
        .expect("references are sound");

    let graph = w.session.causality();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    let (_, _, edge) = graph.edges().next().expect("one edge");
    assert_eq!(edge.kind, CausalEdgeKind::Enables);

    assert!(w.session.validate_timeline().is_empty());
}

#[test]
fn scenario_contrived_cycle_reports_one_circular_dependency() {
    use plotloom_engine::{CausalEdge, CausalityGraph, EventLog};

    let (a, b, c) = (
        plotloom_domain::ActId::new(),
        plotloom_domain::ActId::new(),
        plotloom_domain::ActId::new(),
    );
    let enables = CausalEdge {
        kind: CausalEdgeKind::Enables,
        strength: 0.9,
    };
    let graph = CausalityGraph::from_edges(
        [a, b, c],
        [(a, b, enables), (b, c, enables), (c, a, enables)],
    );

    let conflicts = plotloom_engine::validate(&EventLog::new(), &graph, &ValidatorPolicy::default());
    let cycles: Vec<_> = conflicts
        .iter()
        .filter(|conflict| conflict.kind == ConflictKind::CircularDependency)
        .collect();
    assert_eq!(cycles.len(), 1);
    assert!([a, b, c].contains(&cycles[0].acts[0]));
}

#[test]
fn scenario_effect_starting_before_cause_ends_is_flagged() {
    let mut w = world();
    // Ends at 5 + 10 = 15; the enabled follow-up starts at 10.
    w.session
        .add_act(move_act(&w, 5, w.cellar, w.hall).with_duration(SimMinutes::new(10)))
        .expect("references are sound");
    w.session
        .add_act(move_act(&w, 10, w.hall, w.cellar))
        .expect("references are sound");

    let conflicts = w.session.validate_timeline();
    let timing: Vec<_> = conflicts
        .iter()
        .filter(|conflict| conflict.kind == ConflictKind::TimingConflict)
        .collect();
    assert_eq!(timing.len(), 1);
    assert_eq!(timing[0].acts.len(), 2);
}

#[test]
fn property_replay_is_deterministic() {
    let mut w = world();
    w.session
        .add_act(move_act(&w, 10, w.cellar, w.hall))
        .expect("references are sound");
    w.session
        .add_act(move_act(&w, 20, w.hall, w.cellar))
        .expect("references are sound");

    for t in [0, 5, 10, 15, 20, 25] {
        let first = w.session.state_at(SimMinutes::new(t));
        let second = w.session.state_at(SimMinutes::new(t));
        assert_eq!(first, second);
    }
}

#[test]
fn property_monotonic_replay_between_acts() {
    let mut w = world();
    w.session
        .add_act(move_act(&w, 10, w.cellar, w.hall))
        .expect("references are sound");

    // No act fires between 11 and 100, so the position must not drift.
    let reference = w.session.state_at(SimMinutes::new(11)).position(w.alice);
    for t in [12, 40, 100] {
        assert_eq!(
            w.session.state_at(SimMinutes::new(t)).position(w.alice),
            reference
        );
    }
}

#[test]
fn property_validation_is_idempotent() {
    let mut w = world();
    w.session
        .add_act(move_act(&w, 5, w.cellar, w.hall).with_duration(SimMinutes::new(30)))
        .expect("references are sound");
    w.session
        .add_act(move_act(&w, 10, w.hall, w.cellar))
        .expect("references are sound");

    assert_eq!(w.session.validate_timeline(), w.session.validate_timeline());
}

#[test]
fn property_exhaustive_error_collection() {
    let mut w = world();
    let rumor = w
        .session
        .registry_mut()
        .add_information(Information::new("The vault code"));
    w.session.place_person(w.bob, w.hall, SimMinutes::ZERO);

    // Three independent violations: the speaker never learned the rumor, one
    // recipient is the speaker, the other is elsewhere.
    let speak = Act::new(
        w.alice,
        SimMinutes::new(10),
        ActKind::Speak {
            to: vec![w.alice, w.bob],
            information: rumor,
        },
    );
    let result = w.session.can_execute(&speak);
    assert_eq!(result.errors().len(), 3);
    assert!(result.has_code(ViolationCode::SpeakerLacksKnowledge));
    assert!(result.has_code(ViolationCode::SelfSpeak));
    assert!(result.has_code(ViolationCode::RecipientNotPresent));
}

#[test]
fn scenario_trigger_chain_survives_removal_rules() {
    let mut w = world();
    let first = move_act(&w, 10, w.cellar, w.hall);
    let first_id = first.id();
    w.session.add_act(first).expect("references are sound");

    let followup = move_act(&w, 20, w.hall, w.cellar);
    let followup_id = followup.id();
    w.session
        .add_triggered_act(followup, first_id)
        .expect("cause exists");

    // Removing the cause would dangle the trigger wiring.
    assert!(w.session.remove_act(first_id).is_err());

    // Removing the dependent first, then the cause, works.
    w.session.remove_act(followup_id).expect("act exists");
    w.session.remove_act(first_id).expect("act exists");
    assert!(w.session.log().is_empty());
}
