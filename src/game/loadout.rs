//! Moving items between the inventory and the equipment slots.

use crate::core::error::{GameError, Result};
use crate::core::game_state::PlayerState;
use crate::items::{EquipmentSlot, Item};

/// Equips one unit of `item_id` from the inventory.
///
/// Returns the item that previously occupied the slot; it goes back into
/// the inventory.
pub fn equip_item(player: &mut PlayerState, item_id: &str) -> Result<Option<Item>> {
    let held = player
        .inventory
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotInInventory(item_id.to_string()))?;
    let slot = held
        .slot()
        .ok_or_else(|| GameError::ItemNotEquippable(item_id.to_string()))?;

    let item = held.stack(1);
    player.inventory.remove(item_id, 1);
    let previous = player.equipment.replace(slot, Some(item));
    if let Some(old) = &previous {
        player.inventory.add(old, 1);
    }
    Ok(previous)
}

/// Unequips whatever is in the slot named by `slot`.
pub fn unequip_item(player: &mut PlayerState, slot: &str) -> Result<Item> {
    let slot: EquipmentSlot = slot
        .parse()
        .map_err(|_| GameError::InvalidEquipmentSlot(slot.to_string()))?;
    let item = player
        .equipment
        .replace(slot, None)
        .ok_or_else(|| GameError::NotFound {
            what: "equipped item",
            id: slot.to_string(),
        })?;
    player.inventory.add(&item, 1);
    Ok(item)
}
