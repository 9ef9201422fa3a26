use axum::{extract::rejection::JsonRejection, Json};

pub mod characters;
pub mod decks;
pub mod pokemon;

/// JSON request body; handlers convert the rejection with `?` so malformed
/// bodies get the usual error response.
pub type JsonBody<T> = Result<Json<T>, JsonRejection>;
