use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    errors::Result,
    models::{Pokemon, SeedResponse},
    services::pokemon,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seed", get(seed_database))
        .route("/:id", get(get_pokemon))
}

/// GET /api/pokemon/seed - Cache a batch of random creatures from the catalog
///
/// Responds 502 when the catalog yields nothing usable.
async fn seed_database(State(state): State<AppState>) -> Result<Json<SeedResponse>> {
    let data = pokemon::seed_random_pokemon(
        &state.store,
        &state.catalog,
        pokemon::DEFAULT_SEED_COUNT,
    )
    .await?;

    Ok(Json(SeedResponse {
        message: format!("Success! {} random Pokemon fetched and stored.", data.len()),
        count: data.len(),
        data,
    }))
}

async fn get_pokemon(
    State(state): State<AppState>,
    Path(pokemon_id): Path<i64>,
) -> Result<Json<Pokemon>> {
    Ok(Json(pokemon::get_pokemon_by_id(&state.store, pokemon_id).await?))
}
