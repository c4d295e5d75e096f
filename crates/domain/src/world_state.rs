//! World-state snapshots
//!
//! A [`WorldState`] captures, at one timestamp, where every person stands,
//! who holds or hosts every item, and what every person knows. Snapshots are
//! values: every mutation path clones first, so two callers holding the
//! "same" state can never observe each other's edits.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ids::{ActId, InformationId, ItemId, LocationId, PersonId};
use crate::sim_time::SimMinutes;

/// An immutable snapshot of all entity relationships at one timestamp.
///
/// # Invariants
///
/// - An item appears in at most one of `item_ownership` / `item_locations`;
///   the mutators clear the other map before inserting.
/// - A person the replay has tracked but never placed is present in
///   `person_positions` with `None`, never omitted. Callers must not conflate
///   "unknown" with "absent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    timestamp: SimMinutes,
    person_positions: HashMap<PersonId, Option<LocationId>>,
    last_actions: HashMap<PersonId, Option<ActId>>,
    item_ownership: HashMap<ItemId, PersonId>,
    item_locations: HashMap<ItemId, LocationId>,
    knowledge: HashMap<PersonId, HashSet<InformationId>>,
}

impl WorldState {
    /// An empty snapshot at the given timestamp.
    pub fn at(timestamp: SimMinutes) -> Self {
        Self {
            timestamp,
            person_positions: HashMap::new(),
            last_actions: HashMap::new(),
            item_ownership: HashMap::new(),
            item_locations: HashMap::new(),
            knowledge: HashMap::new(),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    #[inline]
    pub fn timestamp(&self) -> SimMinutes {
        self.timestamp
    }

    /// Where the person currently stands, or `None` if unknown/unplaced.
    pub fn position(&self, person: PersonId) -> Option<LocationId> {
        self.person_positions.get(&person).copied().flatten()
    }

    /// True when the snapshot has an entry for this person at all
    /// (even an unplaced `None` one).
    pub fn tracks(&self, person: PersonId) -> bool {
        self.person_positions.contains_key(&person)
    }

    /// The last act this person performed, if any.
    pub fn last_action(&self, person: PersonId) -> Option<ActId> {
        self.last_actions.get(&person).copied().flatten()
    }

    pub fn owner_of(&self, item: ItemId) -> Option<PersonId> {
        self.item_ownership.get(&item).copied()
    }

    pub fn item_location(&self, item: ItemId) -> Option<LocationId> {
        self.item_locations.get(&item).copied()
    }

    /// True when the item is in neither map (unplaced or consumed).
    pub fn item_is_gone(&self, item: ItemId) -> bool {
        !self.item_ownership.contains_key(&item) && !self.item_locations.contains_key(&item)
    }

    pub fn knows(&self, person: PersonId, information: InformationId) -> bool {
        self.knowledge
            .get(&person)
            .is_some_and(|known| known.contains(&information))
    }

    pub fn knowledge_of(&self, person: PersonId) -> Option<&HashSet<InformationId>> {
        self.knowledge.get(&person)
    }

    pub fn person_positions(&self) -> &HashMap<PersonId, Option<LocationId>> {
        &self.person_positions
    }

    // =========================================================================
    // Mutation (used while deriving the next snapshot; callers clone first)
    // =========================================================================

    pub fn set_timestamp(&mut self, timestamp: SimMinutes) {
        self.timestamp = timestamp;
    }

    /// Ensure the person is tracked, without placing them anywhere.
    pub fn track_person(&mut self, person: PersonId) {
        self.person_positions.entry(person).or_insert(None);
        self.last_actions.entry(person).or_insert(None);
    }

    pub fn set_position(&mut self, person: PersonId, location: LocationId) {
        self.person_positions.insert(person, Some(location));
    }

    pub fn set_last_action(&mut self, person: PersonId, act: ActId) {
        self.last_actions.insert(person, Some(act));
    }

    /// Hand the item to a person, clearing any placed location first.
    pub fn give_item_to(&mut self, item: ItemId, person: PersonId) {
        self.item_locations.remove(&item);
        self.item_ownership.insert(item, person);
    }

    /// Put the item down at a location, clearing any owner first.
    pub fn place_item_at(&mut self, item: ItemId, location: LocationId) {
        self.item_ownership.remove(&item);
        self.item_locations.insert(item, location);
    }

    /// Remove the item from the world entirely (consumed or combined away).
    pub fn clear_item(&mut self, item: ItemId) {
        self.item_ownership.remove(&item);
        self.item_locations.remove(&item);
    }

    pub fn learn(&mut self, person: PersonId, information: InformationId) {
        self.knowledge.entry(person).or_default().insert(information);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_exclusivity_owned_then_placed() {
        let mut state = WorldState::at(SimMinutes::ZERO);
        let item = ItemId::new();
        let person = PersonId::new();
        let location = LocationId::new();

        state.give_item_to(item, person);
        state.place_item_at(item, location);

        assert_eq!(state.owner_of(item), None);
        assert_eq!(state.item_location(item), Some(location));
    }

    #[test]
    fn test_item_exclusivity_placed_then_owned() {
        let mut state = WorldState::at(SimMinutes::ZERO);
        let item = ItemId::new();
        let person = PersonId::new();
        let location = LocationId::new();

        state.place_item_at(item, location);
        state.give_item_to(item, person);

        assert_eq!(state.owner_of(item), Some(person));
        assert_eq!(state.item_location(item), None);
    }

    #[test]
    fn test_tracked_but_unplaced_person() {
        let mut state = WorldState::at(SimMinutes::ZERO);
        let person = PersonId::new();
        state.track_person(person);

        assert!(state.tracks(person));
        assert_eq!(state.position(person), None);
        assert_eq!(state.last_action(person), None);
    }

    #[test]
    fn test_clone_then_mutate_isolation() {
        let mut original = WorldState::at(SimMinutes::ZERO);
        let person = PersonId::new();
        let location = LocationId::new();
        original.track_person(person);

        let mut derived = original.clone();
        derived.set_position(person, location);

        assert_eq!(original.position(person), None);
        assert_eq!(derived.position(person), Some(location));
    }

    #[test]
    fn test_clear_item() {
        let mut state = WorldState::at(SimMinutes::ZERO);
        let item = ItemId::new();
        state.give_item_to(item, PersonId::new());
        state.clear_item(item);
        assert!(state.item_is_gone(item));
    }
}
