use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
    Stellar,
    Unknown,
}

impl PokemonType {
    const ALL: [PokemonType; 20] = [
        PokemonType::Normal,
        PokemonType::Fighting,
        PokemonType::Flying,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Rock,
        PokemonType::Bug,
        PokemonType::Ghost,
        PokemonType::Steel,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Grass,
        PokemonType::Electric,
        PokemonType::Psychic,
        PokemonType::Ice,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Fairy,
        PokemonType::Stellar,
        PokemonType::Unknown,
    ];

    /// Unrecognised names fall back to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(PokemonType::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fighting => "fighting",
            PokemonType::Flying => "flying",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Rock => "rock",
            PokemonType::Bug => "bug",
            PokemonType::Ghost => "ghost",
            PokemonType::Steel => "steel",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Grass => "grass",
            PokemonType::Electric => "electric",
            PokemonType::Psychic => "psychic",
            PokemonType::Ice => "ice",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Fairy => "fairy",
            PokemonType::Stellar => "stellar",
            PokemonType::Unknown => "unknown",
        }
    }
}

/// A creature as cached from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub id: i64,
    pub name: String,
    pub primary_type: PokemonType,
    pub hp: i32,
    pub attack: i32,
    pub defence: i32,
    pub sprite_url: String,
    pub sprite_official_url: String,
}

#[derive(Debug, FromRow)]
pub struct PokemonRow {
    pub id: i64,
    pub name: String,
    pub primary_type: String,
    pub hp: i32,
    pub attack: i32,
    pub defence: i32,
    pub sprite_url: String,
    pub sprite_official_url: String,
}

impl From<PokemonRow> for Pokemon {
    fn from(row: PokemonRow) -> Self {
        Pokemon {
            id: row.id,
            name: row.name,
            primary_type: PokemonType::from_name(&row.primary_type),
            hp: row.hp,
            attack: row.attack,
            defence: row.defence,
            sprite_url: row.sprite_url,
            sprite_official_url: row.sprite_official_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RandomPokemonParams {
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub count: usize,
    pub data: Vec<Pokemon>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_parse_case_insensitively() {
        assert_eq!(PokemonType::from_name("grass"), PokemonType::Grass);
        assert_eq!(PokemonType::from_name("Fire"), PokemonType::Fire);
        assert_eq!(PokemonType::from_name("STELLAR"), PokemonType::Stellar);
    }

    #[test]
    fn unrecognised_types_become_unknown() {
        assert_eq!(PokemonType::from_name("shadow"), PokemonType::Unknown);
        assert_eq!(PokemonType::from_name(""), PokemonType::Unknown);
    }

    #[test]
    fn every_type_round_trips_through_its_name() {
        for t in PokemonType::ALL {
            assert_eq!(PokemonType::from_name(t.as_str()), t);
        }
    }

    #[test]
    fn stored_row_maps_to_domain() {
        let row = PokemonRow {
            id: 25,
            name: "pikachu".into(),
            primary_type: "electric".into(),
            hp: 35,
            attack: 55,
            defence: 40,
            sprite_url: "front.png".into(),
            sprite_official_url: "art.png".into(),
        };
        let pokemon = Pokemon::from(row);

        assert_eq!(pokemon.primary_type, PokemonType::Electric);
        assert_eq!(pokemon.attack + pokemon.defence, 95);
    }
}
