pub mod deck;
pub use deck::*;

pub mod rules;
pub use rules::*;
