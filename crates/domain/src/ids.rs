use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Entity IDs
define_id!(PersonId);
define_id!(LocationId);
define_id!(ItemId);
define_id!(InformationId);

// Timeline IDs
define_id!(ActId);
define_id!(EventId);

/// A reference to any addressable entity or timeline node.
///
/// Used wherever a diagnostic or a causality edge needs to point at "some
/// entity" without committing to one class (e.g. `Violation::involved`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Person(PersonId),
    Location(LocationId),
    Item(ItemId),
    Information(InformationId),
    Act(ActId),
    Event(EventId),
}

impl EntityRef {
    /// Entity class name for diagnostics.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Person(_) => "person",
            Self::Location(_) => "location",
            Self::Item(_) => "item",
            Self::Information(_) => "information",
            Self::Act(_) => "act",
            Self::Event(_) => "event",
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person(id) => write!(f, "person:{id}"),
            Self::Location(id) => write!(f, "location:{id}"),
            Self::Item(id) => write!(f, "item:{id}"),
            Self::Information(id) => write!(f, "information:{id}"),
            Self::Act(id) => write!(f, "act:{id}"),
            Self::Event(id) => write!(f, "event:{id}"),
        }
    }
}

impl From<PersonId> for EntityRef {
    fn from(value: PersonId) -> Self {
        Self::Person(value)
    }
}

impl From<LocationId> for EntityRef {
    fn from(value: LocationId) -> Self {
        Self::Location(value)
    }
}

impl From<ItemId> for EntityRef {
    fn from(value: ItemId) -> Self {
        Self::Item(value)
    }
}

impl From<InformationId> for EntityRef {
    fn from(value: InformationId) -> Self {
        Self::Information(value)
    }
}

impl From<ActId> for EntityRef {
    fn from(value: ActId) -> Self {
        Self::Act(value)
    }
}

impl From<EventId> for EntityRef {
    fn from(value: EventId) -> Self {
        Self::Event(value)
    }
}
