use crate::Card;
use crate::Position;
use crate::Slot;
use crate::cards::Judge;
use crate::config::Config;
use crate::ui::Ui;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Sentinel for "no card here" / "card not on table".
const VACANT: usize = usize::MAX;

/// The shared table: single source of truth for the slot↔card bijection and
/// for every player's tokens. Pure guarded state, no scheduling.
///
/// Exclusion is per slot: any read-modify-write of a slot's card or of any
/// player's token on that slot happens while holding that slot's guard, so
/// distinct slots mutate fully in parallel. The bijection arrays are atomics
/// because `press` paths peek at slot occupancy without taking the guard;
/// writes only ever happen under the owning slot's guard.
///
/// Invariant: `slot_to_card[s] == c` iff `card_to_slot[c] == s`, and each
/// player's pick list is exactly the cards under that player's raised token
/// flags, in the order the tokens went down.
pub struct Table {
    players: usize,
    delay: Duration,
    locks: Vec<Mutex<()>>,
    slot_to_card: Vec<AtomicUsize>,
    card_to_slot: Vec<AtomicUsize>,
    tokens: Vec<Vec<AtomicBool>>,
    picks: Vec<Mutex<Vec<Card>>>,
    ui: Arc<dyn Ui>,
}

impl Table {
    pub fn new(config: &Config, ui: Arc<dyn Ui>) -> Self {
        Self {
            players: config.players(),
            delay: config.delay(),
            locks: (0..config.table_size).map(|_| Mutex::new(())).collect(),
            slot_to_card: (0..config.table_size).map(|_| AtomicUsize::new(VACANT)).collect(),
            card_to_slot: (0..config.deck_size).map(|_| AtomicUsize::new(VACANT)).collect(),
            tokens: (0..config.players())
                .map(|_| (0..config.table_size).map(|_| AtomicBool::new(false)).collect())
                .collect(),
            picks: (0..config.players()).map(|_| Mutex::new(Vec::new())).collect(),
            ui,
        }
    }

    /// Take the exclusion guard for one slot. Every structural or token
    /// mutation of that slot happens inside this guard; never hold two.
    pub fn guard(&self, slot: Slot) -> MutexGuard<'_, ()> {
        self.locks[slot].lock().expect("slot lock poisoned")
    }

    pub fn size(&self) -> usize {
        self.locks.len()
    }
    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        match self.slot_to_card[slot].load(Ordering::Acquire) {
            VACANT => None,
            card => Some(card),
        }
    }
    pub fn slot_of(&self, card: Card) -> Option<Slot> {
        match self.card_to_slot[card].load(Ordering::Acquire) {
            VACANT => None,
            slot => Some(slot),
        }
    }
    pub fn count(&self) -> usize {
        self.board().len()
    }
    /// All cards currently face up, in slot order.
    pub fn board(&self) -> Vec<Card> {
        (0..self.size()).filter_map(|s| self.card_at(s)).collect()
    }

    /// Snapshot of a player's picked cards, in token order.
    pub fn picks_of(&self, player: Position) -> Vec<Card> {
        self.picks(player).clone()
    }
    pub fn has_token(&self, player: Position, slot: Slot) -> bool {
        self.tokens[player][slot].load(Ordering::Acquire)
    }

    fn picks(&self, player: Position) -> MutexGuard<'_, Vec<Card>> {
        self.picks[player].lock().expect("pick list poisoned")
    }
}

// structural mutation, dealer-driven. callers hold the slot guard.
impl Table {
    /// Put a card on an empty slot. Simulates the render delay.
    pub fn place_card(&self, card: Card, slot: Slot) {
        debug_assert!(self.card_at(slot).is_none());
        std::thread::sleep(self.delay);
        self.card_to_slot[card].store(slot, Ordering::Release);
        self.slot_to_card[slot].store(card, Ordering::Release);
        self.ui.place_card(card, slot);
    }

    /// Clear an occupied slot, cascading: every player's token on this slot
    /// comes off (and its card leaves their pick list) before the bijection
    /// entry clears. Simulates the render delay.
    pub fn remove_card(&self, slot: Slot) {
        debug_assert!(self.card_at(slot).is_some());
        std::thread::sleep(self.delay);
        for player in 0..self.players {
            self.remove_token(player, slot);
        }
        if let Some(card) = self.card_at(slot) {
            self.card_to_slot[card].store(VACANT, Ordering::Release);
            self.slot_to_card[slot].store(VACANT, Ordering::Release);
        }
        self.ui.remove_card(slot);
    }
}

// token mutation, player-driven. callers hold the slot guard and never
// push a pick list past the match size.
impl Table {
    /// Record a token for `player` on this slot's card.
    /// No-op if the slot is empty.
    pub fn place_token(&self, player: Position, slot: Slot) {
        if let Some(card) = self.card_at(slot) {
            self.tokens[player][slot].store(true, Ordering::Release);
            self.picks(player).push(card);
            self.ui.place_token(player, slot);
            log::debug!("P{} picked card {}", player, card);
        }
    }

    /// Take a token back off. Reports whether one was there to remove.
    pub fn remove_token(&self, player: Position, slot: Slot) -> bool {
        match self.has_token(player, slot) {
            false => false,
            true => {
                self.tokens[player][slot].store(false, Ordering::Release);
                if let Some(card) = self.card_at(slot) {
                    self.picks(player).retain(|&c| c != card);
                }
                self.ui.remove_token(player, slot);
                true
            }
        }
    }
}

impl Table {
    /// Log every legal set currently on the table. Debug aid.
    pub fn hints(&self, judge: &dyn Judge) {
        for set in judge.matches_in(&self.board(), usize::MAX) {
            let slots = set.iter().filter_map(|&c| self.slot_of(c)).collect::<Vec<_>>();
            log::info!("hint: cards {:?} on slots {:?}", set, slots);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Quiet;

    fn table() -> Table {
        Table::new(&Config::bare(2), Arc::new(Quiet))
    }

    #[test]
    fn placement_keeps_bijection() {
        let table = table();
        table.place_card(7, 3);
        assert!(table.card_at(3) == Some(7));
        assert!(table.slot_of(7) == Some(3));
        assert!(table.count() == 1);
    }

    #[test]
    fn removal_clears_both_directions() {
        let table = table();
        table.place_card(7, 3);
        table.remove_card(3);
        assert!(table.card_at(3).is_none());
        assert!(table.slot_of(7).is_none());
        assert!(table.count() == 0);
    }

    #[test]
    fn token_on_empty_slot_is_a_noop() {
        let table = table();
        table.place_token(0, 5);
        assert!(table.has_token(0, 5) == false);
        assert!(table.picks_of(0).is_empty());
    }

    #[test]
    fn token_toggle_is_idempotent() {
        let table = table();
        table.place_card(7, 3);
        table.place_token(0, 3);
        assert!(table.has_token(0, 3) == true);
        assert!(table.picks_of(0) == vec![7]);
        assert!(table.remove_token(0, 3) == true);
        assert!(table.has_token(0, 3) == false);
        assert!(table.picks_of(0).is_empty());
        assert!(table.remove_token(0, 3) == false);
    }

    #[test]
    fn flags_match_pick_list() {
        let table = table();
        table.place_card(10, 0);
        table.place_card(11, 1);
        table.place_token(1, 0);
        table.place_token(1, 1);
        let flags = (0..table.size()).filter(|&s| table.has_token(1, s)).count();
        assert!(flags == table.picks_of(1).len());
        assert!(table.picks_of(1) == vec![10, 11]);
    }

    #[test]
    fn removal_cascades_to_every_player() {
        let table = table();
        table.place_card(7, 3);
        table.place_token(0, 3);
        table.place_token(1, 3);
        table.remove_card(3);
        assert!(table.has_token(0, 3) == false);
        assert!(table.has_token(1, 3) == false);
        assert!(table.picks_of(0).is_empty());
        assert!(table.picks_of(1).is_empty());
    }

    #[test]
    fn pick_order_follows_token_order() {
        let table = table();
        table.place_card(5, 0);
        table.place_card(6, 1);
        table.place_card(7, 2);
        table.place_token(0, 2);
        table.place_token(0, 0);
        table.place_token(0, 1);
        assert!(table.picks_of(0) == vec![7, 5, 6]);
    }
}
