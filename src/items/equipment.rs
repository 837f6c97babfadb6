use super::types::{EquipmentSlot, Item, ItemStats};
use serde::{Deserialize, Serialize};

/// Player equipment slots. Each slot holds at most one item of quantity 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
        }
    }

    /// Puts an item into a slot and returns whatever was there before.
    pub fn replace(&mut self, slot: EquipmentSlot, item: Option<Item>) -> Option<Item> {
        let target = match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
        };
        std::mem::replace(target, item)
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }

    pub fn weapon_stats(&self) -> ItemStats {
        self.weapon.as_ref().map(Item::stats).unwrap_or_default()
    }

    pub fn armor_stats(&self) -> ItemStats {
        self.armor.as_ref().map(Item::stats).unwrap_or_default()
    }
}
