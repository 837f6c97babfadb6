//! Player inventory keyed by item id.
//!
//! Only stacks with a positive quantity are stored. Removing the last unit
//! of an item removes its entry.

use super::types::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    entries: BTreeMap<ItemId, Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held quantity of an item, 0 when absent.
    pub fn quantity(&self, item_id: &str) -> u32 {
        self.entries.get(item_id).map_or(0, |item| item.quantity)
    }

    pub fn get(&self, item_id: &str) -> Option<&Item> {
        self.entries.get(item_id)
    }

    pub fn contains(&self, item_id: &str, quantity: u32) -> bool {
        self.quantity(item_id) >= quantity
    }

    /// Adds `quantity` units of `template` (saturating). A zero quantity is a no-op.
    pub fn add(&mut self, template: &Item, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.entries
            .entry(template.id.clone())
            .and_modify(|held| held.quantity = held.quantity.saturating_add(quantity))
            .or_insert_with(|| template.stack(quantity));
    }

    /// Removes `quantity` units. Returns false and leaves the inventory
    /// untouched when not enough are held.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> bool {
        let Some(held) = self.entries.get_mut(item_id) else {
            return quantity == 0;
        };
        if held.quantity < quantity {
            return false;
        }
        held.quantity -= quantity;
        if held.quantity == 0 {
            self.entries.remove(item_id);
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_stacks() {
        let logs = Item::resource("logs", "Logs");
        let mut inventory = Inventory::new();
        inventory.add(&logs, 3);
        inventory.add(&logs, 4);
        assert_eq!(inventory.quantity("logs"), 7);
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_add_zero_creates_no_entry() {
        let mut inventory = Inventory::new();
        inventory.add(&Item::resource("logs", "Logs"), 0);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_remove_last_unit_drops_entry() {
        let mut inventory = Inventory::new();
        inventory.add(&Item::resource("logs", "Logs"), 2);
        assert!(inventory.remove("logs", 2));
        assert!(inventory.get("logs").is_none());
        assert_eq!(inventory.quantity("logs"), 0);
    }

    #[test]
    fn test_remove_too_many_leaves_inventory_untouched() {
        let mut inventory = Inventory::new();
        inventory.add(&Item::resource("logs", "Logs"), 2);
        assert!(!inventory.remove("logs", 3));
        assert!(!inventory.remove("raw_fish", 1));
        assert_eq!(inventory.quantity("logs"), 2);
    }

    #[test]
    fn test_add_saturates() {
        let mut inventory = Inventory::new();
        let logs = Item::resource("logs", "Logs");
        inventory.add(&logs, u32::MAX);
        inventory.add(&logs, 10);
        assert_eq!(inventory.quantity("logs"), u32::MAX);
    }
}
