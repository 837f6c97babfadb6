use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 2] = [EquipmentSlot::Weapon, EquipmentSlot::Armor];

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EquipmentSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(EquipmentSlot::Weapon),
            "armor" | "armour" => Ok(EquipmentSlot::Armor),
            _ => Err(s.to_string()),
        }
    }
}

/// Combat bonuses granted by an equipped item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default)]
    pub attack_bonus: u32,
    #[serde(default)]
    pub strength_bonus: u32,
    #[serde(default)]
    pub defense_bonus: u32,
}

/// What an item is. Only equipment carries a slot, so an item has a slot
/// exactly when it is equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Resource,
    Equipment { slot: EquipmentSlot, stats: ItemStats },
}

/// An item stack. Catalog templates have quantity 1; inventory entries carry
/// the held amount; equipped items always have quantity 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub kind: ItemKind,
    pub sell_price: Option<u32>,
    pub buy_price: Option<u32>,
}

impl Item {
    pub fn resource(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            quantity: 1,
            kind: ItemKind::Resource,
            sell_price: None,
            buy_price: None,
        }
    }

    pub fn equipment(id: &str, name: &str, slot: EquipmentSlot, stats: ItemStats) -> Self {
        Self {
            kind: ItemKind::Equipment { slot, stats },
            ..Self::resource(id, name)
        }
    }

    pub fn with_prices(mut self, buy_price: Option<u32>, sell_price: Option<u32>) -> Self {
        self.buy_price = buy_price;
        self.sell_price = sell_price;
        self
    }

    /// A copy of this item with a different stack size.
    pub fn stack(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    pub fn slot(&self) -> Option<EquipmentSlot> {
        match self.kind {
            ItemKind::Equipment { slot, .. } => Some(slot),
            ItemKind::Resource => None,
        }
    }

    pub fn stats(&self) -> ItemStats {
        match self.kind {
            ItemKind::Equipment { stats, .. } => stats,
            ItemKind::Resource => ItemStats::default(),
        }
    }

    pub fn is_equipment(&self) -> bool {
        self.slot().is_some()
    }
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// How to craft an item, keyed by the item it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub output_item: ItemId,
    #[serde(default = "default_output_quantity")]
    pub output_quantity: u32,
    pub skill: crate::skills::types::SkillId,
    pub level: u32,
    pub ingredients: Vec<Ingredient>,
}

fn default_output_quantity() -> u32 {
    1
}
