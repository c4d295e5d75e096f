//! Precondition checks, one function per act kind.
//!
//! Every function appends to a shared result instead of returning early, so
//! an act with N independently-violated rules reports exactly N violations.
//! Check order within a variant is fixed; callers rely on stable output.

use crate::entities::EntityRegistry;
use crate::ids::{ItemId, LocationId, PersonId};
use crate::validation::{ValidationResult, Violation, ViolationCode};
use crate::world_state::WorldState;

use super::{Act, ActKind, ConnectionPolicy};

pub(super) fn check(
    act: &Act,
    state: &WorldState,
    registry: &EntityRegistry,
    policy: &ConnectionPolicy,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let actor = act.actor();
    match act.kind() {
        ActKind::Move { from, to } => {
            check_move(&mut result, state, registry, policy, actor, *from, *to);
        }
        ActKind::GiveItem { item, to } => {
            check_give(&mut result, state, registry, actor, *item, *to);
        }
        ActKind::TakeItem { item } => {
            check_take(&mut result, state, registry, actor, *item);
        }
        ActKind::PlaceItem { item, at } => {
            check_place(&mut result, state, registry, actor, *item, *at);
        }
        ActKind::Speak { to, information } => {
            let information = *information;
            check_speak(&mut result, state, actor, to, information);
        }
        ActKind::UseItem { item } => {
            check_use(&mut result, state, registry, actor, *item);
        }
        ActKind::CombineItems {
            first,
            second,
            output,
        } => {
            check_combine(&mut result, state, registry, actor, *first, *second, *output);
        }
    }
    result
}

fn check_move(
    result: &mut ValidationResult,
    state: &WorldState,
    registry: &EntityRegistry,
    policy: &ConnectionPolicy,
    actor: PersonId,
    from: LocationId,
    to: LocationId,
) {
    if state.position(actor) != Some(from) {
        result.push(
            Violation::new(
                ViolationCode::ActorNotAtSource,
                "actor is not at the move's source location",
            )
            .with_entity(actor)
            .with_entity(from)
            .with_suggestion("insert an earlier move that brings the actor here"),
        );
    }
    if policy.require_connection && from != to && !registry.are_connected(from, to) {
        result.push(
            Violation::new(
                ViolationCode::NoConnection,
                "no connection exists between the two locations",
            )
            .with_entity(from)
            .with_entity(to)
            .with_suggestion("connect the locations or disable connection checking"),
        );
    }
}

fn check_speak(
    result: &mut ValidationResult,
    state: &WorldState,
    actor: PersonId,
    recipients: &[PersonId],
    information: crate::ids::InformationId,
) {
    let speaker_position = state.position(actor);
    if !state.tracks(actor) {
        result.push(
            Violation::new(ViolationCode::SpeakerNotFound, "speaker has no known position")
                .with_entity(actor),
        );
    }
    if !state.knows(actor, information) {
        result.push(
            Violation::new(
                ViolationCode::SpeakerLacksKnowledge,
                "speaker does not know this information",
            )
            .with_entity(actor)
            .with_entity(information)
            .with_suggestion("have someone tell the speaker first"),
        );
    }
    for recipient in recipients {
        let recipient = *recipient;
        if recipient == actor {
            result.push(
                Violation::new(ViolationCode::SelfSpeak, "speaker cannot be their own recipient")
                    .with_entity(actor),
            );
            continue;
        }
        if !state.tracks(recipient) {
            result.push(
                Violation::new(
                    ViolationCode::RecipientNotFound,
                    "recipient has no known position",
                )
                .with_entity(recipient),
            );
        }
        let present = matches!(
            (speaker_position, state.position(recipient)),
            (Some(a), Some(b)) if a == b
        );
        if !present {
            result.push(
                Violation::new(
                    ViolationCode::RecipientNotPresent,
                    "recipient is not at the speaker's location",
                )
                .with_entity(recipient),
            );
        }
    }
}

fn check_give(
    result: &mut ValidationResult,
    state: &WorldState,
    registry: &EntityRegistry,
    actor: PersonId,
    item: ItemId,
    to: PersonId,
) {
    check_item_registered(result, registry, item);
    if state.owner_of(item) != Some(actor) {
        result.push(
            Violation::new(ViolationCode::ItemNotHeld, "actor is not holding the item")
                .with_entity(actor)
                .with_entity(item),
        );
    }
    if !state.tracks(to) {
        result.push(
            Violation::new(
                ViolationCode::RecipientNotFound,
                "recipient has no known position",
            )
            .with_entity(to),
        );
    }
    let together = matches!(
        (state.position(actor), state.position(to)),
        (Some(a), Some(b)) if a == b
    );
    if !together {
        result.push(
            Violation::new(
                ViolationCode::GiverNotWithRecipient,
                "giver and recipient are not at the same location",
            )
            .with_entity(actor)
            .with_entity(to),
        );
    }
}

fn check_take(
    result: &mut ValidationResult,
    state: &WorldState,
    registry: &EntityRegistry,
    actor: PersonId,
    item: ItemId,
) {
    check_item_registered(result, registry, item);
    if registry.item(item).is_some_and(|i| !i.is_portable()) {
        result.push(
            Violation::new(ViolationCode::ItemNotPortable, "item cannot be carried")
                .with_entity(item),
        );
    }
    match state.item_location(item) {
        None => {
            result.push(
                Violation::new(
                    ViolationCode::ItemNotAtLocation,
                    "item is not lying at any location",
                )
                .with_entity(item),
            );
        }
        Some(location) => {
            if state.position(actor) != Some(location) {
                result.push(
                    Violation::new(
                        ViolationCode::ActorNotAtSource,
                        "actor is not at the item's location",
                    )
                    .with_entity(actor)
                    .with_entity(location),
                );
            }
        }
    }
}

fn check_place(
    result: &mut ValidationResult,
    state: &WorldState,
    registry: &EntityRegistry,
    actor: PersonId,
    item: ItemId,
    at: LocationId,
) {
    check_item_registered(result, registry, item);
    if state.owner_of(item) != Some(actor) {
        result.push(
            Violation::new(ViolationCode::ItemNotHeld, "actor is not holding the item")
                .with_entity(actor)
                .with_entity(item),
        );
    }
    if state.position(actor) != Some(at) {
        result.push(
            Violation::new(
                ViolationCode::ActorNotAtSource,
                "actor is not at the target location",
            )
            .with_entity(actor)
            .with_entity(at),
        );
    }
}

fn check_use(
    result: &mut ValidationResult,
    state: &WorldState,
    registry: &EntityRegistry,
    actor: PersonId,
    item: ItemId,
) {
    check_item_registered(result, registry, item);
    if registry.item(item).is_some_and(|i| i.is_consumable()) && state.item_is_gone(item) {
        result.push(
            Violation::new(ViolationCode::ItemConsumed, "item has already been consumed")
                .with_entity(item),
        );
    }
    let held = state.owner_of(item) == Some(actor);
    let co_located = matches!(
        (state.item_location(item), state.position(actor)),
        (Some(a), Some(b)) if a == b
    );
    if !held && !co_located {
        result.push(
            Violation::new(
                ViolationCode::ItemNotHeld,
                "actor neither holds the item nor stands at its location",
            )
            .with_entity(actor)
            .with_entity(item),
        );
    }
}

fn check_combine(
    result: &mut ValidationResult,
    state: &WorldState,
    registry: &EntityRegistry,
    actor: PersonId,
    first: ItemId,
    second: ItemId,
    output: ItemId,
) {
    if first == second {
        result.push(
            Violation::new(
                ViolationCode::SameItemCombine,
                "an item cannot be combined with itself",
            )
            .with_entity(first),
        );
    }
    for item in [first, second, output] {
        check_item_registered(result, registry, item);
    }
    for item in [first, second] {
        if state.owner_of(item) != Some(actor) {
            result.push(
                Violation::new(ViolationCode::ItemNotHeld, "actor is not holding the item")
                    .with_entity(actor)
                    .with_entity(item),
            );
        }
    }
}

fn check_item_registered(result: &mut ValidationResult, registry: &EntityRegistry, item: ItemId) {
    if registry.item(item).is_none() {
        result.push(
            Violation::new(ViolationCode::ItemNotFound, "item is not in the registry")
                .with_entity(item),
        );
    }
}
