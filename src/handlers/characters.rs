use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};

use crate::{
    errors::{AppError, Result},
    handlers::JsonBody,
    models::{
        Character, CharacterSummary, CreateCharacterRequest, CreateCharacterResponse,
        DeckWithPokemon, Pokemon, RandomPokemonParams, UpdateCharacterRequest,
    },
    services::{characters, pokemon},
    AppState,
};

/// Upper bound on creatures granted by a single request.
const MAX_GRANT_COUNT: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_character).get(get_all_characters))
        .route("/:id", patch(update_character))
        .route("/:id/pokemon", get(get_character_pokemon))
        .route("/:id/pokemon/random", post(grant_random_pokemon))
        .route("/:id/decks", get(get_decks_for_character))
}

/// POST /api/character - Create a character and give it a starter
async fn create_character(
    State(state): State<AppState>,
    payload: JsonBody<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<CreateCharacterResponse>)> {
    let Json(payload) = payload?;
    let created = characters::create_character(&state.store, &state.catalog, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/character - All characters with their deck counts
async fn get_all_characters(State(state): State<AppState>) -> Result<Json<Vec<CharacterSummary>>> {
    Ok(Json(characters::get_all_characters(&state.store).await?))
}

/// PATCH /api/character/:id - Change name, age or gender
async fn update_character(
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
    payload: JsonBody<UpdateCharacterRequest>,
) -> Result<Json<Character>> {
    let Json(payload) = payload?;
    Ok(Json(
        characters::update_character(&state.store, character_id, &payload).await?,
    ))
}

/// GET /api/character/:id/pokemon - Every creature the character owns
async fn get_character_pokemon(
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<Vec<Pokemon>>> {
    Ok(Json(
        characters::get_character_pokemon(&state.store, character_id).await?,
    ))
}

/// POST /api/character/:id/pokemon/random?count=N - Fetch N random
/// creatures from the catalog and give them to the character
async fn grant_random_pokemon(
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
    Query(params): Query<RandomPokemonParams>,
) -> Result<Json<Vec<Pokemon>>> {
    let count = params.count.unwrap_or(pokemon::DEFAULT_SEED_COUNT);
    if count == 0 || count > MAX_GRANT_COUNT {
        return Err(AppError::validation(format!(
            "count must be between 1 and {}",
            MAX_GRANT_COUNT
        )));
    }

    Ok(Json(
        pokemon::grant_random_pokemon(&state.store, &state.catalog, character_id, count).await?,
    ))
}

/// GET /api/character/:id/decks - Decks built by the character
async fn get_decks_for_character(
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<Vec<DeckWithPokemon>>> {
    Ok(Json(
        characters::get_decks_for_character(&state.store, character_id).await?,
    ))
}
