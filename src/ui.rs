use crate::Card;
use crate::Position;
use crate::Score;
use crate::Slot;
use std::time::Duration;

/// One-way display boundary. Every call is fire-and-forget and infallible;
/// rendering correctness is someone else's problem. Implementations must be
/// callable from the dealer thread and every player thread.
pub trait Ui: Send + Sync {
    fn place_card(&self, card: Card, slot: Slot);
    fn remove_card(&self, slot: Slot);
    fn place_token(&self, player: Position, slot: Slot);
    fn remove_token(&self, player: Position, slot: Slot);
    fn set_score(&self, player: Position, score: Score);
    /// Remaining round time; `urgent` once below the warning threshold.
    fn set_countdown(&self, remaining: Duration, urgent: bool);
    /// Remaining freeze time for a player, `None` to clear.
    fn set_freeze(&self, player: Position, remaining: Option<Duration>);
    fn announce_winners(&self, winners: &[Position]);
}

/// Log-backed display for terminal play and demos.
#[derive(Debug, Default)]
pub struct Console;

impl Ui for Console {
    fn place_card(&self, card: Card, slot: Slot) {
        log::info!("card {:>2} up on slot {:>2}", card, slot);
    }
    fn remove_card(&self, slot: Slot) {
        log::info!("slot {:>2} cleared", slot);
    }
    fn place_token(&self, player: Position, slot: Slot) {
        log::info!("P{} tokens slot {:>2}", player, slot);
    }
    fn remove_token(&self, player: Position, slot: Slot) {
        log::info!("P{} untokens slot {:>2}", player, slot);
    }
    fn set_score(&self, player: Position, score: Score) {
        log::info!("P{} score {}", player, score);
    }
    fn set_countdown(&self, remaining: Duration, urgent: bool) {
        match urgent {
            true => log::info!("{:>5}ms left !!", remaining.as_millis()),
            false => log::debug!("{:>5}ms left", remaining.as_millis()),
        }
    }
    fn set_freeze(&self, player: Position, remaining: Option<Duration>) {
        match remaining {
            Some(t) => log::info!("P{} frozen for {}s", player, t.as_secs()),
            None => log::info!("P{} thawed", player),
        }
    }
    fn announce_winners(&self, winners: &[Position]) {
        log::info!("winners: {:?}", winners);
    }
}

/// Display that swallows everything. Default for tests.
#[derive(Debug, Default)]
pub struct Quiet;

impl Ui for Quiet {
    fn place_card(&self, _: Card, _: Slot) {}
    fn remove_card(&self, _: Slot) {}
    fn place_token(&self, _: Position, _: Slot) {}
    fn remove_token(&self, _: Position, _: Slot) {}
    fn set_score(&self, _: Position, _: Score) {}
    fn set_countdown(&self, _: Duration, _: bool) {}
    fn set_freeze(&self, _: Position, _: Option<Duration>) {}
    fn announce_winners(&self, _: &[Position]) {}
}
