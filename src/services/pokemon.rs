use futures::future::{join_all, try_join_all};
use rand::seq::index;

use crate::catalog::Catalog;
use crate::errors::{AppError, Result};
use crate::models::{Pokemon, Starter};
use crate::store::{CharacterStore, PokemonStore};

/// Highest id the catalog currently serves.
pub const MAX_CATALOG_ID: i64 = 1025;

/// How many creatures a seed request gathers when none is specified.
pub const DEFAULT_SEED_COUNT: usize = 10;

/// Make sure every starter is cached, fetching the missing ones from the
/// catalog. Any catalog failure aborts.
pub async fn ensure_starters<S, C>(store: &S, catalog: &C) -> Result<()>
where
    S: PokemonStore,
    C: Catalog,
{
    let mut missing = Vec::new();
    for starter in Starter::ALL {
        if !store.pokemon_exists(starter.catalog_id()).await? {
            missing.push(starter.catalog_id());
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    let fetched = try_join_all(missing.iter().map(|id| catalog.fetch_pokemon(*id)))
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to fetch starter Pokemon: {}", e)))?;

    store.upsert_pokemon_batch(&fetched).await?;
    for pokemon in &fetched {
        tracing::info!("Inserted starter Pokémon: {}", pokemon.name);
    }

    Ok(())
}

/// Fetch the given ids concurrently; ids the catalog cannot serve are
/// logged and left out.
pub async fn fetch_pokemon_batch<C: Catalog>(catalog: &C, ids: &[i64]) -> Vec<Pokemon> {
    let results = join_all(ids.iter().map(|id| catalog.fetch_pokemon(*id))).await;

    ids.iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(pokemon) => Some(pokemon),
            Err(e) => {
                tracing::warn!("Failed to fetch Pokemon ID {}: {}", id, e);
                None
            }
        })
        .collect()
}

/// `count` distinct ids in `1..=MAX_CATALOG_ID`.
pub fn pick_random_ids(count: usize) -> Vec<i64> {
    let count = count.min(MAX_CATALOG_ID as usize);
    index::sample(&mut rand::thread_rng(), MAX_CATALOG_ID as usize, count)
        .into_iter()
        .map(|i| i as i64 + 1)
        .collect()
}

/// Fetch `count` random creatures and cache them.
///
/// Fails with `Upstream` only when no fetch succeeded.
pub async fn seed_random_pokemon<S, C>(store: &S, catalog: &C, count: usize) -> Result<Vec<Pokemon>>
where
    S: PokemonStore,
    C: Catalog,
{
    let ids = pick_random_ids(count);
    let fetched = fetch_pokemon_batch(catalog, &ids).await;

    if fetched.is_empty() {
        return Err(AppError::Upstream("No pokemon could be fetched from API".to_string()));
    }

    store.upsert_pokemon_batch(&fetched).await?;
    tracing::info!("Saved {} pokemon to database.", fetched.len());

    Ok(fetched)
}

/// Seed random creatures and hand all of them to a character.
pub async fn grant_random_pokemon<S, C>(
    store: &S,
    catalog: &C,
    character_id: i64,
    count: usize,
) -> Result<Vec<Pokemon>>
where
    S: CharacterStore + PokemonStore,
    C: Catalog,
{
    if !store.character_exists(character_id).await? {
        return Err(AppError::not_found("Character not found."));
    }

    let pokemon = seed_random_pokemon(store, catalog, count).await?;
    for p in &pokemon {
        store.link_pokemon_to_character(character_id, p.id).await?;
    }

    Ok(pokemon)
}

pub async fn get_pokemon_by_id<S: PokemonStore>(store: &S, id: i64) -> Result<Pokemon> {
    store
        .find_pokemon(id)
        .await?
        .ok_or_else(|| AppError::not_found("Pokemon not found."))
}
