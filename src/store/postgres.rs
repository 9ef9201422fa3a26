use std::collections::BTreeMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::Result;
use crate::models::{
    Character, CharacterProfile, CharacterRow, CharacterSummary, DeckRecord, DeckWithPokemon,
    Pokemon, PokemonRow,
};
use crate::store::{CharacterStore, DeckStore, PokemonStore};

/// Postgres-backed store sharing the process-wide pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CharacterStore for PgStore {
    async fn insert_character(&self, profile: &CharacterProfile) -> Result<Character> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO characters (first_name, last_name, age, gender)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(profile.first_name())
        .bind(profile.last_name())
        .bind(profile.age())
        .bind(profile.gender().as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(Character {
            id,
            profile: profile.clone(),
        })
    }

    async fn character_exists(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM characters WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_character(&self, id: i64) -> Result<Option<Character>> {
        let row = sqlx::query_as::<_, CharacterRow>(
            "SELECT id, first_name, last_name, age, gender FROM characters WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Character::try_from).transpose()
    }

    async fn update_character(&self, character: &Character) -> Result<()> {
        let profile = &character.profile;
        sqlx::query(
            r#"
            UPDATE characters
            SET first_name = $2, last_name = $3, age = $4, gender = $5
            WHERE id = $1
            "#,
        )
        .bind(character.id)
        .bind(profile.first_name())
        .bind(profile.last_name())
        .bind(profile.age())
        .bind(profile.gender().as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_characters(&self) -> Result<Vec<CharacterSummary>> {
        let characters = sqlx::query_as::<_, CharacterSummary>(
            r#"
            SELECT
                c.id,
                c.first_name,
                c.last_name,
                c.age,
                c.gender,
                COUNT(d.id) AS deck_count
            FROM characters c
            LEFT JOIN decks d ON d.character_id = c.id
            GROUP BY c.id
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(characters)
    }
}

const POKEMON_COLUMNS: &str =
    "id, name, primary_type, hp, attack, defence, sprite_url, sprite_official_url";

impl PokemonStore for PgStore {
    async fn pokemon_exists(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pokemon WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_pokemon(&self, id: i64) -> Result<Option<Pokemon>> {
        let row = sqlx::query_as::<_, PokemonRow>(&format!(
            "SELECT {} FROM pokemon WHERE id = $1",
            POKEMON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Pokemon::from))
    }

    async fn find_pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>> {
        let row = sqlx::query_as::<_, PokemonRow>(&format!(
            "SELECT {} FROM pokemon WHERE name = $1 ORDER BY id LIMIT 1",
            POKEMON_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Pokemon::from))
    }

    async fn upsert_pokemon_batch(&self, pokemon: &[Pokemon]) -> Result<()> {
        if pokemon.is_empty() {
            return Ok(());
        }

        // ON CONFLICT cannot touch the same row twice in one statement
        let latest: BTreeMap<i64, &Pokemon> = pokemon.iter().map(|p| (p.id, p)).collect();

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO pokemon ({}) ",
            POKEMON_COLUMNS
        ));
        builder.push_values(latest.values(), |mut row, p| {
            row.push_bind(p.id)
                .push_bind(&p.name)
                .push_bind(p.primary_type.as_str())
                .push_bind(p.hp)
                .push_bind(p.attack)
                .push_bind(p.defence)
                .push_bind(&p.sprite_url)
                .push_bind(&p.sprite_official_url);
        });
        builder.push(
            r#"
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                primary_type = EXCLUDED.primary_type,
                hp = EXCLUDED.hp,
                attack = EXCLUDED.attack,
                defence = EXCLUDED.defence,
                sprite_url = EXCLUDED.sprite_url,
                sprite_official_url = EXCLUDED.sprite_official_url
            "#,
        );

        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn link_pokemon_to_character(&self, character_id: i64, pokemon_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO character_pokemon (character_id, pokemon_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(character_id)
        .bind(pokemon_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn pokemon_for_character(&self, character_id: i64) -> Result<Vec<Pokemon>> {
        let rows = sqlx::query_as::<_, PokemonRow>(
            r#"
            SELECT p.id, p.name, p.primary_type, p.hp, p.attack, p.defence,
                   p.sprite_url, p.sprite_official_url
            FROM pokemon p
            JOIN character_pokemon cp ON cp.pokemon_id = p.id
            WHERE cp.character_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(character_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Pokemon::from).collect())
    }

    async fn owned_pokemon_subset(&self, character_id: i64, candidates: &[i64]) -> Result<Vec<i64>> {
        let owned = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT pokemon_id
            FROM character_pokemon
            WHERE character_id = $1 AND pokemon_id = ANY($2)
            "#,
        )
        .bind(character_id)
        .bind(candidates)
        .fetch_all(&self.pool)
        .await?;

        Ok(owned)
    }
}

impl DeckStore for PgStore {
    async fn insert_deck(&self, name: &str, character_id: i64) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO decks (name, character_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(character_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn insert_deck_pokemon(&self, deck_id: i64, pokemon_id: i64) -> Result<()> {
        sqlx::query("INSERT INTO deck_pokemon (deck_id, pokemon_id) VALUES ($1, $2)")
            .bind(deck_id)
            .bind(pokemon_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_deck(&self, id: i64) -> Result<Option<DeckRecord>> {
        let deck = sqlx::query_as::<_, DeckRecord>(
            "SELECT id, character_id, name FROM decks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deck)
    }

    async fn deck_exists(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM decks WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn update_deck_name(&self, id: i64, name: &str) -> Result<()> {
        sqlx::query("UPDATE decks SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear_deck_pokemon(&self, deck_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM deck_pokemon WHERE deck_id = $1")
            .bind(deck_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_deck(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM decks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn decks_for_character(&self, character_id: i64) -> Result<Vec<DeckWithPokemon>> {
        let decks = sqlx::query_as::<_, DeckWithPokemon>(
            r#"
            SELECT
                d.id,
                d.name,
                COALESCE(
                    ARRAY_AGG(dp.pokemon_id ORDER BY dp.pokemon_id)
                        FILTER (WHERE dp.pokemon_id IS NOT NULL),
                    '{}'
                ) AS pokemon_ids
            FROM decks d
            LEFT JOIN deck_pokemon dp ON dp.deck_id = d.id
            WHERE d.character_id = $1
            GROUP BY d.id
            ORDER BY d.id
            "#,
        )
        .bind(character_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    async fn deck_attack_defence_sum(&self, deck_id: i64) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(p.attack + p.defence), 0)::BIGINT
            FROM deck_pokemon dp
            JOIN pokemon p ON p.id = dp.pokemon_id
            WHERE dp.deck_id = $1
            "#,
        )
        .bind(deck_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
