//! Entity registry - single owner of all cast entities
//!
//! The registry is the one place descriptive attributes get edited. Callers
//! that need deletion guarded by act references go through the session layer,
//! which checks the log before delegating here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{EntityRef, InformationId, ItemId, LocationId, PersonId};

use super::{Information, Item, Location, Person};

/// Holds every authored entity, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRegistry {
    persons: HashMap<PersonId, Person>,
    locations: HashMap<LocationId, Location>,
    items: HashMap<ItemId, Item>,
    information: HashMap<InformationId, Information>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    pub fn add_person(&mut self, person: Person) -> PersonId {
        let id = person.id();
        self.persons.insert(id, person);
        id
    }

    pub fn add_location(&mut self, location: Location) -> LocationId {
        let id = location.id();
        self.locations.insert(id, location);
        id
    }

    pub fn add_item(&mut self, item: Item) -> ItemId {
        let id = item.id();
        self.items.insert(id, item);
        id
    }

    pub fn add_information(&mut self, information: Information) -> InformationId {
        let id = information.id();
        self.information.insert(id, information);
        id
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn information(&self, id: InformationId) -> Option<&Information> {
        self.information.get(&id)
    }

    pub fn person_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.persons.get_mut(&id)
    }

    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn information_mut(&mut self, id: InformationId) -> Option<&mut Information> {
        self.information.get_mut(&id)
    }

    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn informations(&self) -> impl Iterator<Item = &Information> {
        self.information.values()
    }

    /// True when the referenced entity exists in the registry.
    ///
    /// Act and event refs are outside the registry's remit and report false.
    pub fn contains(&self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Person(id) => self.persons.contains_key(&id),
            EntityRef::Location(id) => self.locations.contains_key(&id),
            EntityRef::Item(id) => self.items.contains_key(&id),
            EntityRef::Information(id) => self.information.contains_key(&id),
            EntityRef::Act(_) | EntityRef::Event(_) => false,
        }
    }

    // =========================================================================
    // Location graph
    // =========================================================================

    /// Connect two locations (recorded on `from`; connectivity checks treat
    /// edges as undirected).
    pub fn connect_locations(
        &mut self,
        from: LocationId,
        to: LocationId,
    ) -> Result<(), DomainError> {
        if !self.locations.contains_key(&to) {
            return Err(DomainError::not_found("location", to.to_string()));
        }
        let location = self
            .locations
            .get_mut(&from)
            .ok_or_else(|| DomainError::not_found("location", from.to_string()))?;
        location.connect(to);
        Ok(())
    }

    /// True when an edge exists between the two locations in either direction.
    pub fn are_connected(&self, a: LocationId, b: LocationId) -> bool {
        let forward = self.locations.get(&a).is_some_and(|l| l.connects_to(b));
        let backward = self.locations.get(&b).is_some_and(|l| l.connects_to(a));
        forward || backward
    }

    // =========================================================================
    // Removal
    // =========================================================================

    pub fn remove_person(&mut self, id: PersonId) -> Result<Person, DomainError> {
        self.persons
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("person", id.to_string()))
    }

    /// Remove a location and strip every connection pointing at it, so no
    /// dangling edges survive the deletion.
    pub fn remove_location(&mut self, id: LocationId) -> Result<Location, DomainError> {
        let removed = self
            .locations
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("location", id.to_string()))?;
        for location in self.locations.values_mut() {
            location.disconnect(id);
        }
        Ok(removed)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, DomainError> {
        self.items
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("item", id.to_string()))
    }

    pub fn remove_information(&mut self, id: InformationId) -> Result<Information, DomainError> {
        self.information
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("information", id.to_string()))
    }
}
