//! # Session Module
//!
//! The state that outlives any single screen: the player's health, gold
//! and consumables, the floor counter, and the merchant shop modal.
//!
//! There is exactly one [`SessionContext`] per run. Screens borrow it
//! mutably one at a time; control hands off serially, so single-writer
//! discipline is enforced by the caller, never by locking.

use crate::config;
use serde::{Deserialize, Serialize};

/// The player's long-lived state, constructed once per run.
///
/// Combat writes residual health back here, the merchant debits gold,
/// and potion use heals through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub max_health: i32,
    pub current_health: i32,
    pub gold: u32,
    pub potion_amount: u32,
    pub lucky_die_amount: u32,
}

impl PlayerState {
    /// Creates the starting loadout for a new run.
    pub fn new() -> Self {
        Self {
            max_health: config::PLAYER_MAX_HEALTH,
            current_health: config::PLAYER_MAX_HEALTH,
            gold: 50,
            potion_amount: 3,
            lucky_die_amount: 1,
        }
    }

    /// Whether the player is still standing.
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Heals by `amount`, clamped to max health.
    pub fn heal(&mut self, amount: i32) {
        self.current_health = (self.current_health + amount).min(self.max_health);
    }

    /// Drinks one potion if any is owned; returns whether one was used.
    pub fn use_potion(&mut self) -> bool {
        if self.potion_amount == 0 {
            return false;
        }
        self.potion_amount -= 1;
        self.heal(config::POTION_HEAL);
        log::debug!(
            "potion used: {} health, {} potions left",
            self.current_health,
            self.potion_amount
        );
        true
    }

    /// Debits `cost` gold; returns whether the player could afford it.
    pub fn spend_gold(&mut self, cost: u32) -> bool {
        if self.gold < cost {
            return false;
        }
        self.gold -= cost;
        true
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one run carries across screens.
///
/// An explicit context object: exploration and combat entry points take
/// it by mutable reference instead of reading ambient globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub player: PlayerState,
    pub floor_number: u32,
}

impl SessionContext {
    /// Starts a run on floor one with a fresh player.
    pub fn new() -> Self {
        Self {
            player: PlayerState::new(),
            floor_number: 1,
        }
    }

    /// Moves to the next floor.
    pub fn advance_floor(&mut self) {
        self.floor_number += 1;
        log::info!("descending to floor {}", self.floor_number);
    }

    /// Whether the current floor hosts the boss.
    pub fn is_final_floor(&self) -> bool {
        self.floor_number == config::FINAL_FLOOR
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One purchasable entry in the merchant's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    Potion,
    LuckyDie,
}

impl ShopItem {
    /// Price in gold.
    pub fn cost(self) -> u32 {
        match self {
            ShopItem::Potion => 50,
            ShopItem::LuckyDie => 100,
        }
    }

    /// Display name for the shop row.
    pub fn name(self) -> &'static str {
        match self {
            ShopItem::Potion => "Potion",
            ShopItem::LuckyDie => "Lucky die",
        }
    }
}

/// Input the shop modal understands, already mapped from raw events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopInput {
    /// Move the selection left
    Prev,
    /// Move the selection right
    Next,
    /// Attempt to buy the selected item
    Buy,
    /// Leave the shop
    Close,
}

/// What a shop input did, for the front end's feedback line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopEvent {
    /// Selection moved or nothing happened
    Browsing,
    /// The purchase went through
    Bought(ShopItem),
    /// Not enough gold for the selected item
    TooPoor(ShopItem),
    /// The player closed the menu
    Closed,
}

/// The merchant's buy menu as a modal state.
///
/// Pushed onto the single exploration update/render loop while open;
/// the screen keeps ticking, it just routes input here instead of into
/// movement.
#[derive(Debug, Clone)]
pub struct ShopMenu {
    items: Vec<ShopItem>,
    selected: usize,
}

impl ShopMenu {
    /// Opens the standard stock.
    pub fn new() -> Self {
        Self {
            items: vec![ShopItem::Potion, ShopItem::LuckyDie],
            selected: 0,
        }
    }

    /// The items on display.
    pub fn items(&self) -> &[ShopItem] {
        &self.items
    }

    /// Index of the highlighted item.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The highlighted item.
    pub fn selected_item(&self) -> ShopItem {
        self.items[self.selected]
    }

    /// Applies one input, mutating the player's purse on a purchase.
    pub fn handle_input(&mut self, input: ShopInput, player: &mut PlayerState) -> ShopEvent {
        match input {
            ShopInput::Prev => {
                self.selected = (self.selected + self.items.len() - 1) % self.items.len();
                ShopEvent::Browsing
            }
            ShopInput::Next => {
                self.selected = (self.selected + 1) % self.items.len();
                ShopEvent::Browsing
            }
            ShopInput::Buy => {
                let item = self.selected_item();
                if !player.spend_gold(item.cost()) {
                    log::debug!("not enough gold for {}", item.name());
                    return ShopEvent::TooPoor(item);
                }
                match item {
                    ShopItem::Potion => player.potion_amount += 1,
                    ShopItem::LuckyDie => player.lucky_die_amount += 1,
                }
                log::info!("bought {} for {} gold", item.name(), item.cost());
                ShopEvent::Bought(item)
            }
            ShopInput::Close => ShopEvent::Closed,
        }
    }
}

impl Default for ShopMenu {
    fn default() -> Self {
        Self::new()
    }
}
