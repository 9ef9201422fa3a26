pub mod character;
pub mod deck;
pub mod pokemon;

pub use character::*;
pub use deck::*;
pub use pokemon::*;
