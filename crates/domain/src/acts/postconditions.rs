//! Postcondition application, one function per act kind.
//!
//! Always clone-then-mutate: the input snapshot is never touched. Recipients
//! or items that would fail validation are skipped defensively even though
//! preconditions should have blocked the call.

use crate::entities::EntityRegistry;
use crate::world_state::WorldState;

use super::{Act, ActKind};

pub(super) fn apply(act: &Act, state: &WorldState, registry: &EntityRegistry) -> WorldState {
    let mut next = state.clone();
    let actor = act.actor();
    next.track_person(actor);
    match act.kind() {
        ActKind::Move { to, .. } => {
            next.set_position(actor, *to);
        }
        ActKind::GiveItem { item, to } => {
            next.track_person(*to);
            next.give_item_to(*item, *to);
        }
        ActKind::TakeItem { item } => {
            next.give_item_to(*item, actor);
        }
        ActKind::PlaceItem { item, at } => {
            next.place_item_at(*item, *at);
        }
        ActKind::Speak { to, information } => {
            let speaker_position = state.position(actor);
            for recipient in to {
                let recipient = *recipient;
                // Skip recipients the preconditions would have rejected.
                if recipient == actor {
                    continue;
                }
                let present = matches!(
                    (speaker_position, state.position(recipient)),
                    (Some(a), Some(b)) if a == b
                );
                if present {
                    next.learn(recipient, *information);
                }
            }
        }
        ActKind::UseItem { item } => {
            if registry.item(*item).is_some_and(|i| i.is_consumable()) {
                next.clear_item(*item);
            }
        }
        ActKind::CombineItems {
            first,
            second,
            output,
        } => {
            next.clear_item(*first);
            next.clear_item(*second);
            next.give_item_to(*output, actor);
        }
    }
    next.set_last_action(actor, act.id());
    next
}
