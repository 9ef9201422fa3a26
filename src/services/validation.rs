//! Input validation for character and deck requests.
//!
//! Every check runs before any persistence call and fails with
//! `AppError::Validation` carrying a message that names the field.

use std::collections::HashSet;

use serde_json::Value;

use crate::errors::{AppError, Result};
use crate::models::{
    CharacterChanges, CharacterProfile, CreateCharacterRequest, DeckInput, DeckRequest, Gender,
    NewCharacter, Starter, UpdateCharacterRequest, DECK_SIZE,
};

const DECK_NAME_MIN: usize = 5;
const DECK_NAME_MAX: usize = 45;

const AGE_MESSAGE: &str = "Age must be between 13 and 110";
const INVALID_GENDER: &str = "Invalid gender";
const INVALID_STARTER: &str = "Invalid starter Pokemon";

/// Each field is checked completely (shape, then its rule) before the next
/// one, in the order firstName, lastName, age, gender, starter.
pub fn validate_create_character(req: &CreateCharacterRequest) -> Result<NewCharacter> {
    let first_name = name_field(&req.first_name, "First name")?;
    CharacterProfile::check_name(&first_name, "First name")?;
    let last_name = name_field(&req.last_name, "Last name")?;
    CharacterProfile::check_name(&last_name, "Last name")?;
    let age = age_field(&req.age)?;
    CharacterProfile::check_age(age)?;
    let gender = gender_field(&req.gender)?;
    let starter = starter_field(&req.starter)?;

    let profile = CharacterProfile::new(first_name, last_name, age, gender)?;
    Ok(NewCharacter { profile, starter })
}

/// Only present fields are checked; range rules are applied when the
/// changes are written onto the stored profile.
pub fn validate_update_character(req: &UpdateCharacterRequest) -> Result<CharacterChanges> {
    let changes = CharacterChanges {
        first_name: optional(&req.first_name, |v| name_field(v, "First name"))?,
        last_name: optional(&req.last_name, |v| name_field(v, "Last name"))?,
        age: optional(&req.age, age_field)?,
        gender: optional(&req.gender, gender_field)?,
    };

    if changes.first_name.is_none()
        && changes.last_name.is_none()
        && changes.age.is_none()
        && changes.gender.is_none()
    {
        return Err(AppError::validation("Nothing to update"));
    }

    Ok(changes)
}

pub fn validate_create_deck(req: &DeckRequest) -> Result<DeckInput> {
    let name = deck_name(&req.name)?;
    let pokemon_ids = deck_pokemon_ids(&req.pokemon_ids)?;
    Ok(DeckInput { name, pokemon_ids })
}

/// Updates replace the whole deck, so they follow the create rules.
pub fn validate_update_deck(req: &DeckRequest) -> Result<DeckInput> {
    validate_create_deck(req)
}

fn optional<T>(value: &Value, parse: impl FnOnce(&Value) -> Result<T>) -> Result<Option<T>> {
    match value {
        Value::Null => Ok(None),
        other => parse(other).map(Some),
    }
}

fn name_field(value: &Value, field: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Null => Err(AppError::validation(format!("{} cannot be empty", field))),
        _ => Err(AppError::validation(format!("{} must be a string", field))),
    }
}

fn age_field(value: &Value) -> Result<i32> {
    let age = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        _ => None,
    };
    age.and_then(|age| i32::try_from(age).ok())
        .ok_or_else(|| AppError::validation(AGE_MESSAGE))
}

fn gender_field(value: &Value) -> Result<Gender> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err(AppError::validation("Gender is required")),
        Value::String(s) => Gender::parse(s).ok_or_else(|| AppError::validation(INVALID_GENDER)),
        Value::Null => Err(AppError::validation("Gender is required")),
        _ => Err(AppError::validation(INVALID_GENDER)),
    }
}

fn starter_field(value: &Value) -> Result<Starter> {
    value
        .as_str()
        .and_then(Starter::parse)
        .ok_or_else(|| AppError::validation(INVALID_STARTER))
}

fn deck_name(value: &Value) -> Result<String> {
    let raw = match value {
        Value::String(s) => s,
        Value::Null => return Err(AppError::validation("Deck name cannot be empty or null")),
        _ => return Err(AppError::validation("Deck name must be a string")),
    };

    let name = raw.trim();
    let length = name.chars().count();
    if length == 0 {
        return Err(AppError::validation("Deck name cannot be empty or null"));
    }
    if length < DECK_NAME_MIN {
        return Err(AppError::validation("Deck name is too short"));
    }
    if length > DECK_NAME_MAX {
        return Err(AppError::validation("Deck name is too long"));
    }

    Ok(name.to_string())
}

fn deck_pokemon_ids(value: &Value) -> Result<Vec<i64>> {
    let items = value
        .as_array()
        .ok_or_else(|| AppError::validation("pokemonIds must be an array"))?;

    if items.len() != DECK_SIZE {
        return Err(AppError::validation(format!(
            "Deck must contain exactly {} Pokemon",
            DECK_SIZE
        )));
    }

    let ids = items
        .iter()
        .map(coerce_id)
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(|| AppError::validation("Pokemon IDs must be numbers"))?;

    let distinct: HashSet<i64> = ids.iter().copied().collect();
    if distinct.len() != ids.len() {
        return Err(AppError::validation("Deck cannot contain duplicate Pokemon"));
    }

    Ok(ids)
}

/// Numbers and numeric strings are accepted as long as they are finite
/// whole numbers.
fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(whole_number),
        _ => None,
    }
}

/// Whole, finite values inside the i64 range.
fn whole_number(number: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    if number.is_finite() && number.fract() == 0.0 && in_range {
        Some(number as i64)
    } else {
        None
    }
}
