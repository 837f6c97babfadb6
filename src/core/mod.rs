//! Core game state, progression math and the catch-up pass.

pub mod constants;
pub mod error;
pub mod game_state;
pub mod leveling;
pub mod offline;

pub use error::GameError;
pub use game_state::PlayerState;
pub use offline::{advance_player, AdvanceReport};
