//! Location entity - Places people stand in and move between
//!
//! Locations carry their outgoing connections as plain id lists; the registry
//! answers connectivity questions treating edges as undirected (a connection
//! recorded on either endpoint satisfies a move in both directions).

use serde::{Deserialize, Serialize};

use crate::ids::LocationId;

/// A location in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    id: LocationId,
    name: String,
    description: Option<String>,
    /// Locations reachable from here. Deduplicated; order is authoring order.
    connections: Vec<LocationId>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            description: None,
            connections: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn id(&self) -> LocationId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn connections(&self) -> &[LocationId] {
        &self.connections
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Record a connection to another location. Duplicates are ignored.
    pub fn connect(&mut self, other: LocationId) {
        if other != self.id && !self.connections.contains(&other) {
            self.connections.push(other);
        }
    }

    /// Remove a recorded connection, if present.
    pub fn disconnect(&mut self, other: LocationId) {
        self.connections.retain(|c| *c != other);
    }

    /// True when this location records an outgoing connection to `other`.
    pub fn connects_to(&self, other: LocationId) -> bool {
        self.connections.contains(&other)
    }
}
