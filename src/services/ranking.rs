use crate::errors::{AppError, Result};
use crate::models::DeckRank;

/// Map a deck's attack + defence total to its rank letter.
pub fn calculate_deck_rank(total: f64) -> Result<DeckRank> {
    if !total.is_finite() {
        return Err(AppError::validation("Total must be a valid number"));
    }
    if total < 0.0 {
        return Err(AppError::validation("Total must be >= 0"));
    }

    let rank = if total <= 399.0 {
        DeckRank::D
    } else if total <= 499.0 {
        DeckRank::C
    } else if total <= 599.0 {
        DeckRank::B
    } else if total <= 799.0 {
        DeckRank::A
    } else {
        DeckRank::S
    };

    Ok(rank)
}
