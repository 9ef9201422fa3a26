use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::{Validate, ValidateLength, ValidateRange, ValidationErrors};

use crate::errors::{AppError, Result};
use crate::models::Pokemon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// The three creatures a new character may pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Starter {
    Bulbasaur,
    Charmander,
    Squirtle,
}

impl Starter {
    pub const ALL: [Starter; 3] = [Starter::Bulbasaur, Starter::Charmander, Starter::Squirtle];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|starter| starter.name().eq_ignore_ascii_case(raw.trim()))
    }

    /// Catalog id of the starter.
    pub fn catalog_id(&self) -> i64 {
        match self {
            Starter::Bulbasaur => 1,
            Starter::Charmander => 4,
            Starter::Squirtle => 7,
        }
    }

    /// Name as stored in the catalog (lowercase).
    pub fn name(&self) -> &'static str {
        match self {
            Starter::Bulbasaur => "bulbasaur",
            Starter::Charmander => "charmander",
            Starter::Squirtle => "squirtle",
        }
    }
}

const PROFILE_FIELD_ORDER: [&str; 3] = ["first_name", "last_name", "age"];

// Keep in step with the `#[validate]` attributes below.
const NAME_MIN: u64 = 3;
const NAME_MAX: u64 = 45;
const AGE_MIN: i32 = 13;
const AGE_MAX: i32 = 110;

/// Mutable, always-valid part of a character.
///
/// Every constructor and setter runs the same rules, so a profile that
/// exists has passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    #[validate(length(min = 3, max = 45, message = "First name must be between 3 and 45 characters"))]
    first_name: String,
    #[validate(length(min = 3, max = 45, message = "Last name must be between 3 and 45 characters"))]
    last_name: String,
    #[validate(range(min = 13, max = 110, message = "Age must be between 13 and 110"))]
    age: i32,
    gender: Gender,
}

impl CharacterProfile {
    pub fn new(first_name: String, last_name: String, age: i32, gender: Gender) -> Result<Self> {
        let profile = CharacterProfile {
            first_name,
            last_name,
            age,
            gender,
        };
        profile.check()?;
        Ok(profile)
    }

    /// Length rule for a single name field, for callers that report
    /// failures field by field before a whole profile exists.
    pub fn check_name(value: &str, field: &str) -> Result<()> {
        if value.validate_length(Some(NAME_MIN), Some(NAME_MAX), None) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "{} must be between {} and {} characters",
                field, NAME_MIN, NAME_MAX
            )))
        }
    }

    pub fn check_age(value: i32) -> Result<()> {
        if value.validate_range(Some(AGE_MIN), Some(AGE_MAX), None, None) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Age must be between {} and {}",
                AGE_MIN, AGE_MAX
            )))
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn set_first_name(&mut self, value: String) -> Result<()> {
        self.replace_with(|p| p.first_name = value)
    }

    pub fn set_last_name(&mut self, value: String) -> Result<()> {
        self.replace_with(|p| p.last_name = value)
    }

    pub fn set_age(&mut self, value: i32) -> Result<()> {
        self.replace_with(|p| p.age = value)
    }

    pub fn set_gender(&mut self, value: Gender) {
        self.gender = value;
    }

    fn replace_with(&mut self, apply: impl FnOnce(&mut Self)) -> Result<()> {
        let mut candidate = self.clone();
        apply(&mut candidate);
        candidate.check()?;
        *self = candidate;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| AppError::Validation(first_error_message(&errors)))
    }
}

/// Pick a single message, in field declaration order, so callers always see
/// the same error for the same input.
fn first_error_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    for name in PROFILE_FIELD_ORDER {
        if let Some((_, errs)) = fields.iter().find(|(field, _)| **field == name) {
            if let Some(message) = errs.iter().find_map(|e| e.message.as_ref()) {
                return message.to_string();
            }
        }
    }
    errors.to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct Character {
    pub id: i64,
    #[serde(flatten)]
    pub profile: CharacterProfile,
}

#[derive(Debug, FromRow)]
pub struct CharacterRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: String,
}

impl TryFrom<CharacterRow> for Character {
    type Error = AppError;

    fn try_from(row: CharacterRow) -> Result<Self> {
        let gender = Gender::parse(&row.gender).ok_or_else(|| {
            AppError::Persistence(sqlx::Error::Decode(
                format!("unknown gender '{}' stored for character {}", row.gender, row.id).into(),
            ))
        })?;
        Ok(Character {
            id: row.id,
            profile: CharacterProfile::new(row.first_name, row.last_name, row.age, gender)?,
        })
    }
}

/// Listing entry: a character plus how many decks it has built.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: String,
    pub deck_count: i64,
}

/// Raw body of `POST /api/character`.
///
/// Fields stay untyped so malformed shapes (arrays, numbers where text is
/// expected) surface as field-specific validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCharacterRequest {
    pub first_name: Value,
    pub last_name: Value,
    pub age: Value,
    pub gender: Value,
    pub starter: Value,
}

/// Raw body of `PATCH /api/character/:id`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCharacterRequest {
    pub first_name: Value,
    pub last_name: Value,
    pub age: Value,
    pub gender: Value,
}

#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub profile: CharacterProfile,
    pub starter: Starter,
}

#[derive(Debug, Clone, Default)]
pub struct CharacterChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Serialize)]
pub struct CreateCharacterResponse {
    pub character: Character,
    pub starter: Pokemon,
}
