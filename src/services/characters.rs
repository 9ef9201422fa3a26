use crate::catalog::Catalog;
use crate::errors::{AppError, Result};
use crate::models::{
    Character, CharacterSummary, CreateCharacterRequest, CreateCharacterResponse,
    DeckWithPokemon, Pokemon, UpdateCharacterRequest,
};
use crate::services::pokemon::ensure_starters;
use crate::services::validation::{validate_create_character, validate_update_character};
use crate::store::{CharacterStore, DeckStore, PokemonStore};

/// Create a character and hand it the chosen starter.
pub async fn create_character<S, C>(
    store: &S,
    catalog: &C,
    req: &CreateCharacterRequest,
) -> Result<CreateCharacterResponse>
where
    S: CharacterStore + PokemonStore,
    C: Catalog,
{
    let new_character = validate_create_character(req)?;

    ensure_starters(store, catalog).await?;

    let character = store.insert_character(&new_character.profile).await?;

    let starter = store
        .find_pokemon_by_name(new_character.starter.name())
        .await?
        .ok_or_else(|| AppError::not_found("Starter Pokemon not found in database."))?;

    store.link_pokemon_to_character(character.id, starter.id).await?;

    tracing::info!(
        character_id = character.id,
        starter = %starter.name,
        "character created"
    );

    Ok(CreateCharacterResponse { character, starter })
}

/// Apply a partial update; each changed field is re-validated.
pub async fn update_character<S>(
    store: &S,
    character_id: i64,
    req: &UpdateCharacterRequest,
) -> Result<Character>
where
    S: CharacterStore,
{
    let changes = validate_update_character(req)?;

    let mut character = store
        .find_character(character_id)
        .await?
        .ok_or_else(|| AppError::not_found("Character not found."))?;

    if let Some(first_name) = changes.first_name {
        character.profile.set_first_name(first_name)?;
    }
    if let Some(last_name) = changes.last_name {
        character.profile.set_last_name(last_name)?;
    }
    if let Some(age) = changes.age {
        character.profile.set_age(age)?;
    }
    if let Some(gender) = changes.gender {
        character.profile.set_gender(gender);
    }

    store.update_character(&character).await?;
    Ok(character)
}

pub async fn get_character_pokemon<S: PokemonStore>(store: &S, character_id: i64) -> Result<Vec<Pokemon>> {
    store.pokemon_for_character(character_id).await
}

pub async fn get_all_characters<S: CharacterStore>(store: &S) -> Result<Vec<CharacterSummary>> {
    store.list_characters().await
}

pub async fn get_decks_for_character<S>(store: &S, character_id: i64) -> Result<Vec<DeckWithPokemon>>
where
    S: CharacterStore + DeckStore,
{
    if !store.character_exists(character_id).await? {
        return Err(AppError::not_found("Character not found."));
    }

    store.decks_for_character(character_id).await
}
