use crate::Card;

/// Match-validation boundary. The engine never decides legality itself;
/// it hands card ids to a Judge and acts on the verdict. Implementations
/// must be pure and synchronous.
pub trait Judge: Send + Sync {
    /// Whether these card ids form a legal match.
    fn is_legal_match(&self, cards: &[Card]) -> bool;
    /// Collect up to `limit` legal matches hiding in `cards`.
    /// `limit == 1` asks for mere existence.
    fn matches_in(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>>;
}

/// Standard Set legality: a card id encodes one value per feature in base
/// `options`, and a match is `options` cards whose values are, per feature,
/// either all equal or pairwise distinct.
#[derive(Debug, Clone, Copy)]
pub struct SetRules {
    features: usize,
    options: usize,
}

impl Default for SetRules {
    fn default() -> Self {
        Self {
            features: 4,
            options: 3,
        }
    }
}

impl SetRules {
    pub fn new(features: usize, options: usize) -> Self {
        Self { features, options }
    }

    fn value(&self, card: Card, feature: usize) -> usize {
        card / self.options.pow(feature as u32) % self.options
    }

    fn feature_ok(&self, cards: &[Card], feature: usize) -> bool {
        let values = cards
            .iter()
            .map(|&c| self.value(c, feature))
            .collect::<Vec<_>>();
        let same = values.iter().all(|&v| v == values[0]);
        let distinct = (0..values.len()).all(|i| (0..i).all(|j| values[i] != values[j]));
        same || distinct
    }

    fn search(&self, cards: &[Card], pick: &mut Vec<Card>, from: usize, found: &mut Vec<Vec<Card>>, limit: usize) {
        if found.len() >= limit {
            return;
        }
        if pick.len() == self.options {
            if self.is_legal_match(pick) {
                found.push(pick.clone());
            }
            return;
        }
        for i in from..cards.len() {
            pick.push(cards[i]);
            self.search(cards, pick, i + 1, found, limit);
            pick.pop();
        }
    }
}

impl Judge for SetRules {
    fn is_legal_match(&self, cards: &[Card]) -> bool {
        cards.len() == self.options && (0..self.features).all(|f| self.feature_ok(cards, f))
    }

    fn matches_in(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>> {
        let mut found = Vec::new();
        self.search(cards, &mut Vec::new(), 0, &mut found, limit);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_distinct_in_one_feature() {
        // 0 = (0,0,0,0), 1 = (1,0,0,0), 2 = (2,0,0,0)
        let rules = SetRules::default();
        assert!(rules.is_legal_match(&[0, 1, 2]) == true);
    }

    #[test]
    fn all_distinct_in_every_feature() {
        // 0 = (0,0,0,0), 40 = (1,1,1,1), 80 = (2,2,2,2)
        let rules = SetRules::default();
        assert!(rules.is_legal_match(&[0, 40, 80]) == true);
    }

    #[test]
    fn two_equal_one_different_is_illegal() {
        // first feature values 0, 1, 1
        let rules = SetRules::default();
        assert!(rules.is_legal_match(&[0, 1, 1]) == false);
        assert!(rules.is_legal_match(&[0, 1, 4]) == false);
    }

    #[test]
    fn wrong_arity_is_illegal() {
        let rules = SetRules::default();
        assert!(rules.is_legal_match(&[0, 1]) == false);
        assert!(rules.is_legal_match(&[0, 1, 2, 3]) == false);
    }

    #[test]
    fn existence_query_stops_at_limit() {
        let rules = SetRules::default();
        let cards = (0..81).collect::<Vec<_>>();
        assert!(rules.matches_in(&cards, 1).len() == 1);
        assert!(rules.matches_in(&[], 1).is_empty());
    }

    #[test]
    fn barren_collection_has_no_match() {
        // 0=(0,0,0,0) 1=(1,0,0,0) 3=(0,1,0,0): every triple breaks a feature
        let rules = SetRules::default();
        assert!(rules.matches_in(&[0, 1, 3], usize::MAX).is_empty());
    }
}
