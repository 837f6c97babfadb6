//! Buying from and selling to the shop.

use crate::catalog::Catalog;
use crate::core::error::{GameError, Result};
use crate::core::game_state::PlayerState;
use crate::items::ItemId;

/// Outcome of a completed trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub item_id: ItemId,
    pub quantity: u32,
    /// Gold paid (buy) or received (sell)
    pub gold: u64,
}

pub fn buy_item(
    player: &mut PlayerState,
    catalog: &dyn Catalog,
    item_id: &str,
    quantity: u32,
) -> Result<Trade> {
    if quantity == 0 {
        return Err(GameError::InvalidQuantity);
    }
    let template = catalog
        .item(item_id)
        .ok_or_else(|| GameError::item_not_found(item_id))?;
    let price = template
        .buy_price
        .ok_or_else(|| GameError::NotBuyable(item_id.to_string()))?;

    let cost = price as u64 * quantity as u64;
    if cost > player.gold as u64 {
        return Err(GameError::InsufficientGold {
            required: cost,
            available: player.gold,
        });
    }

    // cost <= gold, so it fits in u32
    player.gold -= cost as u32;
    player.inventory.add(template, quantity);

    Ok(Trade {
        item_id: template.id.clone(),
        quantity,
        gold: cost,
    })
}

pub fn sell_item(
    player: &mut PlayerState,
    catalog: &dyn Catalog,
    item_id: &str,
    quantity: u32,
) -> Result<Trade> {
    if quantity == 0 {
        return Err(GameError::InvalidQuantity);
    }
    let template = catalog
        .item(item_id)
        .ok_or_else(|| GameError::item_not_found(item_id))?;
    let price = template
        .sell_price
        .ok_or_else(|| GameError::NotSellable(item_id.to_string()))?;

    let held = player.inventory.quantity(item_id);
    if held < quantity {
        return Err(GameError::InsufficientItems {
            item_id: item_id.to_string(),
            required: quantity,
            available: held,
        });
    }

    let proceeds = price as u64 * quantity as u64;
    player.inventory.remove(item_id, quantity);
    player.add_gold(u32::try_from(proceeds).unwrap_or(u32::MAX));

    Ok(Trade {
        item_id: template.id.clone(),
        quantity,
        gold: proceeds,
    })
}
