use std::collections::BTreeSet;

use crate::errors::{AppError, Result};
use crate::store::PokemonStore;

/// Ensure `character_id` owns every id in `candidates`.
///
/// Candidates are treated as a set, so repeated ids count once. An empty
/// set is trivially owned and skips the store.
pub async fn reconcile_ownership<S>(store: &S, character_id: i64, candidates: &[i64]) -> Result<()>
where
    S: PokemonStore,
{
    let requested: BTreeSet<i64> = candidates.iter().copied().collect();
    if requested.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = requested.iter().copied().collect();
    let owned: BTreeSet<i64> = store
        .owned_pokemon_subset(character_id, &ids)
        .await?
        .into_iter()
        .filter(|id| requested.contains(id))
        .collect();

    if owned.len() != requested.len() {
        tracing::debug!(
            character_id,
            requested = requested.len(),
            owned = owned.len(),
            "ownership shortfall"
        );
        return Err(AppError::not_found("Character does not own all selected Pokemon."));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    async fn store_owning(character_id: i64, ids: &[i64]) -> MemoryStore {
        let store = MemoryStore::new();
        for id in ids {
            store.link_pokemon_to_character(character_id, *id).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn owning_every_candidate_passes() {
        let store = store_owning(1, &[1, 4, 7, 25, 52, 99]).await;
        reconcile_ownership(&store, 1, &[52, 1, 25, 4, 7]).await.unwrap();
    }

    #[tokio::test]
    async fn one_missing_id_fails() {
        let store = store_owning(1, &[1, 2, 3, 4]).await;
        let err = reconcile_ownership(&store, 1, &[1, 2, 3, 4, 999]).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("does not own all selected Pokemon"));
    }

    #[tokio::test]
    async fn ownership_is_per_character() {
        let store = store_owning(2, &[1, 2, 3, 4, 5]).await;
        assert!(reconcile_ownership(&store, 1, &[1, 2, 3, 4, 5]).await.is_err());
    }

    #[tokio::test]
    async fn empty_candidate_set_is_trivially_owned() {
        let store = MemoryStore::new();
        reconcile_ownership(&store, 1, &[]).await.unwrap();
    }

    #[tokio::test]
    async fn repeated_candidates_count_once() {
        let store = store_owning(1, &[1, 2]).await;
        reconcile_ownership(&store, 1, &[1, 1, 2]).await.unwrap();
    }
}
