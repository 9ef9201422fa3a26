//! Client for the external creature catalog (PokeAPI).

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::errors::{AppError, Result};
use crate::models::{Pokemon, PokemonType};

pub trait Catalog: Send + Sync {
    /// Fetch one creature. Non-success statuses and malformed bodies are
    /// `AppError::Upstream`.
    fn fetch_pokemon(&self, id: i64) -> impl Future<Output = Result<Pokemon>> + Send;
}

#[derive(Debug, Deserialize)]
struct PokeApiResponse {
    id: i64,
    name: String,
    #[serde(default)]
    types: Vec<PokeApiTypeSlot>,
    #[serde(default)]
    stats: Vec<PokeApiStat>,
    sprites: PokeApiSprites,
}

#[derive(Debug, Deserialize)]
struct PokeApiTypeSlot {
    #[serde(rename = "type")]
    kind: PokeApiNamed,
}

#[derive(Debug, Deserialize)]
struct PokeApiStat {
    base_stat: i32,
    stat: PokeApiNamed,
}

#[derive(Debug, Deserialize)]
struct PokeApiNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PokeApiSprites {
    front_default: Option<String>,
    #[serde(default)]
    other: Option<PokeApiOtherSprites>,
}

#[derive(Debug, Deserialize)]
struct PokeApiOtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<PokeApiArtwork>,
}

#[derive(Debug, Deserialize)]
struct PokeApiArtwork {
    front_default: Option<String>,
}

impl From<PokeApiResponse> for Pokemon {
    fn from(data: PokeApiResponse) -> Self {
        let primary_type = data
            .types
            .first()
            .map(|slot| PokemonType::from_name(&slot.kind.name))
            .unwrap_or(PokemonType::Unknown);

        let stat = |name: &str| {
            data.stats
                .iter()
                .find(|s| s.stat.name == name)
                .map(|s| s.base_stat.max(0))
                .unwrap_or(0)
        };

        let sprite_official_url = data
            .sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|art| art.front_default.clone())
            .unwrap_or_default();

        Pokemon {
            id: data.id,
            name: data.name.clone(),
            primary_type,
            hp: stat("hp"),
            attack: stat("attack"),
            defence: stat("defense"),
            sprite_url: data.sprites.front_default.clone().unwrap_or_default(),
            sprite_official_url,
        }
    }
}

#[derive(Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PokeApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("pokedex-backend")
            .build()?;

        Ok(Self { http, base_url })
    }

    fn pokemon_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), id)
    }
}

impl Catalog for PokeApiClient {
    async fn fetch_pokemon(&self, id: i64) -> Result<Pokemon> {
        let response = self.http.get(self.pokemon_url(id)).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Catalog returned status {} for Pokemon {}",
                response.status(),
                id
            )));
        }

        let data: PokeApiResponse = response.json().await?;
        Ok(Pokemon::from(data))
    }
}
