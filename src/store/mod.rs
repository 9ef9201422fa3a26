//! Persistence seams used by the services.
//!
//! Services are generic over these traits so the orchestration can run
//! against Postgres in production and an in-memory store in tests.

use std::future::Future;

use crate::errors::Result;
use crate::models::{
    Character, CharacterProfile, CharacterSummary, DeckRecord, DeckWithPokemon, Pokemon,
};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

pub trait CharacterStore: Send + Sync {
    fn insert_character(
        &self,
        profile: &CharacterProfile,
    ) -> impl Future<Output = Result<Character>> + Send;

    fn character_exists(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;

    fn find_character(&self, id: i64) -> impl Future<Output = Result<Option<Character>>> + Send;

    fn update_character(&self, character: &Character) -> impl Future<Output = Result<()>> + Send;

    fn list_characters(&self) -> impl Future<Output = Result<Vec<CharacterSummary>>> + Send;
}

pub trait PokemonStore: Send + Sync {
    fn pokemon_exists(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;

    fn find_pokemon(&self, id: i64) -> impl Future<Output = Result<Option<Pokemon>>> + Send;

    fn find_pokemon_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Pokemon>>> + Send;

    /// Insert or refresh rows by id; the latest values win.
    fn upsert_pokemon_batch(&self, pokemon: &[Pokemon]) -> impl Future<Output = Result<()>> + Send;

    /// Record ownership. Linking an already owned creature is a no-op.
    fn link_pokemon_to_character(
        &self,
        character_id: i64,
        pokemon_id: i64,
    ) -> impl Future<Output = Result<()>> + Send;

    fn pokemon_for_character(
        &self,
        character_id: i64,
    ) -> impl Future<Output = Result<Vec<Pokemon>>> + Send;

    /// The ids from `candidates` that the character owns.
    fn owned_pokemon_subset(
        &self,
        character_id: i64,
        candidates: &[i64],
    ) -> impl Future<Output = Result<Vec<i64>>> + Send;
}

pub trait DeckStore: Send + Sync {
    fn insert_deck(&self, name: &str, character_id: i64) -> impl Future<Output = Result<i64>> + Send;

    fn insert_deck_pokemon(
        &self,
        deck_id: i64,
        pokemon_id: i64,
    ) -> impl Future<Output = Result<()>> + Send;

    fn find_deck(&self, id: i64) -> impl Future<Output = Result<Option<DeckRecord>>> + Send;

    fn deck_exists(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;

    fn update_deck_name(&self, id: i64, name: &str) -> impl Future<Output = Result<()>> + Send;

    fn clear_deck_pokemon(&self, deck_id: i64) -> impl Future<Output = Result<()>> + Send;

    fn delete_deck(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    fn decks_for_character(
        &self,
        character_id: i64,
    ) -> impl Future<Output = Result<Vec<DeckWithPokemon>>> + Send;

    /// Sum of attack + defence over the deck's members.
    fn deck_attack_defence_sum(&self, deck_id: i64) -> impl Future<Output = Result<i64>> + Send;
}
