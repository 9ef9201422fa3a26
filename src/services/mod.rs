//! Stateless orchestration over the store and catalog seams.

pub mod characters;
pub mod decks;
pub mod ownership;
pub mod pokemon;
pub mod ranking;
pub mod validation;
