use crate::errors::{AppError, Result};
use crate::models::{DeckRankResponse, DeckRequest, DeckResponse, DeleteDeckResponse};
use crate::services::ownership::reconcile_ownership;
use crate::services::ranking::calculate_deck_rank;
use crate::services::validation::{validate_create_deck, validate_update_deck};
use crate::store::{CharacterStore, DeckStore, PokemonStore};

pub async fn create_deck<S>(store: &S, character_id: i64, req: &DeckRequest) -> Result<DeckResponse>
where
    S: CharacterStore + PokemonStore + DeckStore,
{
    let input = validate_create_deck(req)?;

    if !store.character_exists(character_id).await? {
        return Err(AppError::not_found("Character not found."));
    }

    reconcile_ownership(store, character_id, &input.pokemon_ids).await?;

    let deck_id = store.insert_deck(&input.name, character_id).await?;
    for pokemon_id in &input.pokemon_ids {
        store.insert_deck_pokemon(deck_id, *pokemon_id).await?;
    }

    tracing::info!(deck_id, character_id, "deck created");

    Ok(DeckResponse {
        deck_id,
        name: input.name,
        pokemon_ids: input.pokemon_ids,
    })
}

/// Rename the deck and replace its whole membership.
///
/// Concurrent updates of one deck are not serialized; the last writer's
/// membership wins.
pub async fn update_deck<S>(store: &S, deck_id: i64, req: &DeckRequest) -> Result<DeckResponse>
where
    S: PokemonStore + DeckStore,
{
    let input = validate_update_deck(req)?;

    let deck = store
        .find_deck(deck_id)
        .await?
        .ok_or_else(|| AppError::not_found("Deck not found."))?;

    reconcile_ownership(store, deck.character_id, &input.pokemon_ids).await?;

    store.update_deck_name(deck_id, &input.name).await?;
    store.clear_deck_pokemon(deck_id).await?;
    for pokemon_id in &input.pokemon_ids {
        store.insert_deck_pokemon(deck_id, *pokemon_id).await?;
    }

    Ok(DeckResponse {
        deck_id,
        name: input.name,
        pokemon_ids: input.pokemon_ids,
    })
}

pub async fn delete_deck<S: DeckStore>(store: &S, deck_id: i64) -> Result<DeleteDeckResponse> {
    if !store.deck_exists(deck_id).await? {
        return Err(AppError::not_found("Deck not found."));
    }

    store.clear_deck_pokemon(deck_id).await?;
    store.delete_deck(deck_id).await?;

    Ok(DeleteDeckResponse {
        message: "Deck deleted successfully".to_string(),
        deck_id,
    })
}

pub async fn get_deck_rank<S: DeckStore>(store: &S, deck_id: i64) -> Result<DeckRankResponse> {
    if !store.deck_exists(deck_id).await? {
        return Err(AppError::not_found("Deck not found."));
    }

    let total = store.deck_attack_defence_sum(deck_id).await?;
    let rank = calculate_deck_rank(total as f64)?;

    Ok(DeckRankResponse { deck_id, total, rank })
}
