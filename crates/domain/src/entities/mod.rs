//! Cast entities and the registry that owns them.

mod information;
mod item;
mod location;
mod person;
mod registry;

pub use information::{Information, Secrecy};
pub use item::{Item, ItemCategory};
pub use location::Location;
pub use person::Person;
pub use registry::EntityRegistry;
