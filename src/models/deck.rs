use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Number of creatures every deck holds.
pub const DECK_SIZE: usize = 5;

/// Raw body of deck create/update requests, checked by
/// `services::validation::validate_create_deck`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckRequest {
    pub name: Value,
    pub pokemon_ids: Value,
}

/// A deck request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckInput {
    pub name: String,
    pub pokemon_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DeckRecord {
    pub id: i64,
    pub character_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeckWithPokemon {
    pub id: i64,
    pub name: String,
    pub pokemon_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckResponse {
    pub deck_id: i64,
    pub name: String,
    pub pokemon_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateDeckResponse {
    pub message: String,
    pub deck: DeckResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDeckResponse {
    pub message: String,
    pub deck_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DeckRank {
    D,
    C,
    B,
    A,
    S,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRankResponse {
    pub deck_id: i64,
    pub total: i64,
    pub rank: DeckRank,
}
