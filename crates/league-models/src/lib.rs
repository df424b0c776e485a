//! # league-models
//!
//! Domain models for League RS.
//!
//! Each model implements the core traits from `league-core` (`Entity`,
//! `Identifiable`). Every attribute is optional, so the same structs serve
//! as full bodies for `PUT` and as patches for `PATCH`.

pub use league_core::traits::{Entity, Id, Identifiable};

pub mod player;
pub mod team;

pub use player::Player;
pub use team::Team;
