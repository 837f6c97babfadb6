//! Skills: identity, per-skill progress, mastery and the gathering resolver.

pub mod gathering;
pub mod mastery;
pub mod types;

pub use gathering::*;
pub use mastery::*;
pub use types::*;
