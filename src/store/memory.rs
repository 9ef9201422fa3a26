use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::errors::Result;
use crate::models::{
    Character, CharacterProfile, CharacterSummary, DeckRecord, DeckWithPokemon, Pokemon,
};
use crate::store::{CharacterStore, DeckStore, PokemonStore};

#[derive(Default)]
struct Tables {
    next_character_id: i64,
    next_deck_id: i64,
    characters: BTreeMap<i64, Character>,
    pokemon: BTreeMap<i64, Pokemon>,
    ownership: BTreeSet<(i64, i64)>,
    decks: BTreeMap<i64, DeckRecord>,
    deck_pokemon: BTreeSet<(i64, i64)>,
}

/// Store used by service tests; mirrors the Postgres semantics.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pokemon(pokemon: impl IntoIterator<Item = Pokemon>) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.lock().unwrap();
            for p in pokemon {
                tables.pokemon.insert(p.id, p);
            }
        }
        store
    }

    pub fn ownership_count(&self, character_id: i64) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .ownership
            .iter()
            .filter(|(owner, _)| *owner == character_id)
            .count()
    }

    pub fn deck_members(&self, deck_id: i64) -> Vec<i64> {
        let tables = self.tables.lock().unwrap();
        tables
            .deck_pokemon
            .iter()
            .filter(|(deck, _)| *deck == deck_id)
            .map(|(_, pokemon)| *pokemon)
            .collect()
    }

    pub fn pokemon_count(&self) -> usize {
        self.tables.lock().unwrap().pokemon.len()
    }
}

impl CharacterStore for MemoryStore {
    async fn insert_character(&self, profile: &CharacterProfile) -> Result<Character> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_character_id += 1;
        let character = Character {
            id: tables.next_character_id,
            profile: profile.clone(),
        };
        tables.characters.insert(character.id, character.clone());
        Ok(character)
    }

    async fn character_exists(&self, id: i64) -> Result<bool> {
        Ok(self.tables.lock().unwrap().characters.contains_key(&id))
    }

    async fn find_character(&self, id: i64) -> Result<Option<Character>> {
        Ok(self.tables.lock().unwrap().characters.get(&id).cloned())
    }

    async fn update_character(&self, character: &Character) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(stored) = tables.characters.get_mut(&character.id) {
            *stored = character.clone();
        }
        Ok(())
    }

    async fn list_characters(&self) -> Result<Vec<CharacterSummary>> {
        let tables = self.tables.lock().unwrap();
        let summaries = tables
            .characters
            .values()
            .map(|c| CharacterSummary {
                id: c.id,
                first_name: c.profile.first_name().to_string(),
                last_name: c.profile.last_name().to_string(),
                age: c.profile.age(),
                gender: c.profile.gender().as_str().to_string(),
                deck_count: tables
                    .decks
                    .values()
                    .filter(|d| d.character_id == c.id)
                    .count() as i64,
            })
            .collect();
        Ok(summaries)
    }
}

impl PokemonStore for MemoryStore {
    async fn pokemon_exists(&self, id: i64) -> Result<bool> {
        Ok(self.tables.lock().unwrap().pokemon.contains_key(&id))
    }

    async fn find_pokemon(&self, id: i64) -> Result<Option<Pokemon>> {
        Ok(self.tables.lock().unwrap().pokemon.get(&id).cloned())
    }

    async fn find_pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.pokemon.values().find(|p| p.name == name).cloned())
    }

    async fn upsert_pokemon_batch(&self, pokemon: &[Pokemon]) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        for p in pokemon {
            tables.pokemon.insert(p.id, p.clone());
        }
        Ok(())
    }

    async fn link_pokemon_to_character(&self, character_id: i64, pokemon_id: i64) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .ownership
            .insert((character_id, pokemon_id));
        Ok(())
    }

    async fn pokemon_for_character(&self, character_id: i64) -> Result<Vec<Pokemon>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .ownership
            .iter()
            .filter(|(owner, _)| *owner == character_id)
            .filter_map(|(_, id)| tables.pokemon.get(id).cloned())
            .collect())
    }

    async fn owned_pokemon_subset(&self, character_id: i64, candidates: &[i64]) -> Result<Vec<i64>> {
        let tables = self.tables.lock().unwrap();
        Ok(candidates
            .iter()
            .copied()
            .filter(|id| tables.ownership.contains(&(character_id, *id)))
            .collect())
    }
}

impl DeckStore for MemoryStore {
    async fn insert_deck(&self, name: &str, character_id: i64) -> Result<i64> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_deck_id += 1;
        let id = tables.next_deck_id;
        tables.decks.insert(
            id,
            DeckRecord {
                id,
                character_id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    async fn insert_deck_pokemon(&self, deck_id: i64, pokemon_id: i64) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .deck_pokemon
            .insert((deck_id, pokemon_id));
        Ok(())
    }

    async fn find_deck(&self, id: i64) -> Result<Option<DeckRecord>> {
        Ok(self.tables.lock().unwrap().decks.get(&id).cloned())
    }

    async fn deck_exists(&self, id: i64) -> Result<bool> {
        Ok(self.tables.lock().unwrap().decks.contains_key(&id))
    }

    async fn update_deck_name(&self, id: i64, name: &str) -> Result<()> {
        if let Some(deck) = self.tables.lock().unwrap().decks.get_mut(&id) {
            deck.name = name.to_string();
        }
        Ok(())
    }

    async fn clear_deck_pokemon(&self, deck_id: i64) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .deck_pokemon
            .retain(|(deck, _)| *deck != deck_id);
        Ok(())
    }

    async fn delete_deck(&self, id: i64) -> Result<()> {
        self.tables.lock().unwrap().decks.remove(&id);
        Ok(())
    }

    async fn decks_for_character(&self, character_id: i64) -> Result<Vec<DeckWithPokemon>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .decks
            .values()
            .filter(|d| d.character_id == character_id)
            .map(|d| DeckWithPokemon {
                id: d.id,
                name: d.name.clone(),
                pokemon_ids: tables
                    .deck_pokemon
                    .iter()
                    .filter(|(deck, _)| *deck == d.id)
                    .map(|(_, pokemon)| *pokemon)
                    .collect(),
            })
            .collect())
    }

    async fn deck_attack_defence_sum(&self, deck_id: i64) -> Result<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .deck_pokemon
            .iter()
            .filter(|(deck, _)| *deck == deck_id)
            .filter_map(|(_, id)| tables.pokemon.get(id))
            .map(|p| i64::from(p.attack) + i64::from(p.defence))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PokemonType;

    fn pokemon(id: i64, attack: i32, defence: i32) -> Pokemon {
        Pokemon {
            id,
            name: format!("p{}", id),
            primary_type: PokemonType::Normal,
            hp: 10,
            attack,
            defence,
            sprite_url: String::new(),
            sprite_official_url: String::new(),
        }
    }

    #[tokio::test]
    async fn upsert_keeps_latest_values() {
        let store = MemoryStore::new();
        store.upsert_pokemon_batch(&[pokemon(1, 10, 10)]).await.unwrap();
        store.upsert_pokemon_batch(&[pokemon(1, 99, 50)]).await.unwrap();

        assert_eq!(store.pokemon_count(), 1);
        let stored = store.find_pokemon(1).await.unwrap().unwrap();
        assert_eq!(stored.attack, 99);
        assert_eq!(stored.defence, 50);
    }

    #[tokio::test]
    async fn attack_defence_sum_covers_deck_members_only() {
        let store = MemoryStore::with_pokemon([pokemon(1, 100, 50), pokemon(2, 80, 40), pokemon(3, 500, 500)]);
        let deck_id = store.insert_deck("Test Deck", 1).await.unwrap();
        store.insert_deck_pokemon(deck_id, 1).await.unwrap();
        store.insert_deck_pokemon(deck_id, 2).await.unwrap();

        assert_eq!(store.deck_attack_defence_sum(deck_id).await.unwrap(), 270);
    }
}
