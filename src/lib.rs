//! Skillbound - idle skilling and combat simulation
//!
//! Players train gathering skills in the background, craft with artisan
//! skills, fight enemies and trade in a shop. All progress is simulated in
//! closed form from elapsed time, so a player can be advanced by a second
//! or by a week in the same amount of work.

pub mod build_info;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod core;
pub mod game;
pub mod items;
pub mod skills;
pub mod store;

pub use catalog::{Catalog, StaticCatalog};
pub use config::{GameConfig, StoreKind};
pub use crate::core::{AdvanceReport, GameError, PlayerState};
pub use game::Game;
pub use skills::SkillId;
pub use store::{InMemoryPlayerStore, JsonPlayerStore, PlayerStore, SnapshotPlayerStore, StoreError};
