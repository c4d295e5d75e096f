//! Plotloom domain - the value types of the causal world-state engine.
//!
//! Everything here is pure and synchronous: entities, world-state snapshots,
//! the act contract, and validation results. The engine crate folds these
//! into timelines; this crate never performs I/O.

pub mod acts;
pub mod entities;
pub mod error;
pub mod ids;
pub mod sim_time;
pub mod validation;
pub mod world_state;

pub use acts::{Act, ActKind, ConnectionPolicy};
pub use entities::{EntityRegistry, Information, Item, ItemCategory, Location, Person, Secrecy};
pub use error::DomainError;
pub use ids::{ActId, EntityRef, EventId, InformationId, ItemId, LocationId, PersonId};
pub use sim_time::SimMinutes;
pub use validation::{ValidationResult, Violation, ViolationCode};
pub use world_state::WorldState;
