//! Item entity - Objects that can be held, placed, used, and combined

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// Broad item category, used for UI grouping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ItemCategory {
    Weapon,
    Tool,
    Document,
    Key,
    /// Other/custom category (for forward compatibility)
    #[default]
    #[serde(other)]
    Other,
}

impl ItemCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Weapon => "Weapon",
            Self::Tool => "Tool",
            Self::Document => "Document",
            Self::Key => "Key",
            Self::Other => "Item",
        }
    }
}

/// An item in the world.
///
/// # Invariants
///
/// - `portable` gates Take/Give acts; a non-portable item can still be used
///   in place.
/// - `consumable` items vanish from the world state when used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    name: String,
    category: ItemCategory,
    portable: bool,
    consumable: bool,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            category: ItemCategory::default(),
            portable: true,
            consumable: false,
        }
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn fixed_in_place(mut self) -> Self {
        self.portable = false;
        self
    }

    pub fn consumable(mut self) -> Self {
        self.consumable = true;
        self
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn category(&self) -> ItemCategory {
        self.category
    }

    #[inline]
    pub fn is_portable(&self) -> bool {
        self.portable
    }

    #[inline]
    pub fn is_consumable(&self) -> bool {
        self.consumable
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
