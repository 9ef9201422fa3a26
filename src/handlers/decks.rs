use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{
    errors::Result,
    handlers::JsonBody,
    models::{CreateDeckResponse, DeckRankResponse, DeckRequest, DeckResponse, DeleteDeckResponse},
    services::decks,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:id",
            post(create_deck).put(update_deck).delete(delete_deck),
        )
        .route("/:id/rank", get(get_deck_rank))
}

/// POST /api/deck/:character_id - Build a deck from five owned creatures
async fn create_deck(
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
    payload: JsonBody<DeckRequest>,
) -> Result<(StatusCode, Json<CreateDeckResponse>)> {
    let Json(payload) = payload?;
    let deck = decks::create_deck(&state.store, character_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateDeckResponse {
            message: "Deck created successfully".to_string(),
            deck,
        }),
    ))
}

/// PUT /api/deck/:deck_id - Replace name and members
async fn update_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    payload: JsonBody<DeckRequest>,
) -> Result<Json<DeckResponse>> {
    let Json(payload) = payload?;
    Ok(Json(decks::update_deck(&state.store, deck_id, &payload).await?))
}

/// DELETE /api/deck/:deck_id
async fn delete_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DeleteDeckResponse>> {
    Ok(Json(decks::delete_deck(&state.store, deck_id).await?))
}

/// GET /api/deck/:deck_id/rank - Attack + defence total and its rank letter
async fn get_deck_rank(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DeckRankResponse>> {
    Ok(Json(decks::get_deck_rank(&state.store, deck_id).await?))
}
