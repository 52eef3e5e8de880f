use crate::Card;
use rand::Rng;

/// The cards not currently on the table. Owned exclusively by the dealer:
/// shrinks via ::draw() as slots are filled, regains cards via ::restore()
/// when the table is cleared. Order is irrelevant, draws are uniform.
#[derive(Debug, Clone)]
pub struct Deck(Vec<Card>);

impl Deck {
    pub fn new(size: usize) -> Self {
        Self((0..size).collect())
    }

    /// remove a uniformly random card from the deck
    pub fn draw(&mut self) -> Option<Card> {
        match self.0.len() {
            0 => None,
            n => Some(self.0.swap_remove(rand::rng().random_range(0..n))),
        }
    }

    /// return a card that was on the table
    pub fn restore(&mut self, card: Card) {
        self.0.push(card);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn cards(&self) -> &[Card] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_without_replacement() {
        let mut deck = Deck::new(81);
        let mut seen = std::collections::HashSet::new();
        while let Some(card) = deck.draw() {
            assert!(card < 81);
            assert!(seen.insert(card));
        }
        assert!(seen.len() == 81);
        assert!(deck.is_empty());
    }

    #[test]
    fn restore_grows_the_deck() {
        let mut deck = Deck::new(3);
        let card = deck.draw().expect("non-empty");
        assert!(deck.len() == 2);
        deck.restore(card);
        assert!(deck.len() == 3);
    }
}
