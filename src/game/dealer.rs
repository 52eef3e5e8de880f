use super::pit::Pit;
use super::player::Player;
use super::player::Verdict;
use crate::DEALER_TICK;
use crate::Position;
use crate::cards::Deck;
use crate::cards::Judge;
use crate::config::Config;
use crate::table::Table;
use crate::ui::Ui;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// The single arbiter thread: deals cards, runs the round countdown,
/// services match claims strictly FIFO (one per timer tick), reshuffles on
/// timeout, detects game end, and owns shutdown sequencing.
///
/// Structural table mutation never runs concurrently with itself: matches
/// and reshuffles both happen on this thread, and each takes the slot guard
/// for every slot it touches.
pub struct Dealer {
    config: Config,
    table: Arc<Table>,
    pit: Arc<Pit>,
    ui: Arc<dyn Ui>,
    judge: Arc<dyn Judge>,
    players: Vec<Arc<Player>>,
    handles: Vec<Option<JoinHandle<()>>>,
    stack: Vec<Position>,
    deck: Deck,
    deadline: Instant,
    finished: bool,
}

impl Dealer {
    pub fn new(
        config: Config,
        table: Arc<Table>,
        pit: Arc<Pit>,
        ui: Arc<dyn Ui>,
        judge: Arc<dyn Judge>,
        players: Vec<Arc<Player>>,
    ) -> Self {
        let deadline = Instant::now() + config.timeout();
        let deck = Deck::new(config.deck_size);
        let handles = players.iter().map(|_| None).collect();
        Self {
            config,
            table,
            pit,
            ui,
            judge,
            players,
            handles,
            stack: Vec::new(),
            deck,
            deadline,
            finished: false,
        }
    }

    /// Main loop: deal, count down a round, reshuffle; repeat until the
    /// game ends or stop is requested. Announces winners only when the
    /// matches genuinely ran out, then tears everything down.
    pub fn run(mut self) {
        log::info!("dealer thread starting");
        self.spawn();
        while !self.should_finish() {
            self.deal();
            if self.config.hints {
                self.table.hints(self.judge.as_ref());
            }
            self.reset_timer();
            self.round();
            self.reshuffle();
        }
        if self.exhausted() {
            self.announce_winners();
        }
        self.shutdown();
        log::info!("dealer thread terminated");
    }

    fn should_finish(&self) -> bool {
        self.pit.stopped() || self.finished || self.exhausted()
    }

    /// No legal match anywhere: deck and table combined.
    fn exhausted(&self) -> bool {
        let mut pool = self.deck.cards().to_vec();
        pool.extend(self.table.board());
        self.judge.matches_in(&pool, 1).is_empty()
    }
}

// round lifecycle.
impl Dealer {
    /// Fill every empty slot with a uniform random draw while the deck
    /// lasts, then let the players back in.
    pub(crate) fn deal(&mut self) {
        for slot in 0..self.table.size() {
            if self.table.card_at(slot).is_none() {
                let _guard = self.table.guard(slot);
                if let Some(card) = self.deck.draw() {
                    self.table.place_card(card, slot);
                }
            }
        }
        self.pit.set_reshuffling(false);
        for player in &self.players {
            player.rouse();
        }
    }

    /// Countdown loop: bounded doze on the bell, countdown refresh, at most
    /// one claim serviced, top-up of newly empty slots.
    fn round(&mut self) {
        while !self.pit.stopped() && !self.finished && Instant::now() < self.deadline {
            self.pit.doze(DEALER_TICK);
            self.tick();
            self.check();
            self.deal();
        }
    }

    pub(crate) fn reset_timer(&mut self) {
        self.deadline = Instant::now() + self.config.timeout();
        self.ui.set_countdown(self.config.timeout(), false);
    }

    fn tick(&self) {
        let left = self.deadline.saturating_duration_since(Instant::now());
        self.ui.set_countdown(left, left <= self.config.warning());
    }

    /// Timeout or forced: flush every action queue, return the table's
    /// cards to the deck with cascading token cleanup, restart the clock.
    pub(crate) fn reshuffle(&mut self) {
        self.pit.set_reshuffling(true);
        for player in &self.players {
            player.flush();
        }
        for slot in 0..self.table.size() {
            let _guard = self.table.guard(slot);
            if let Some(card) = self.table.card_at(slot) {
                self.deck.restore(card);
                self.table.remove_card(slot);
            }
        }
        self.reset_timer();
        log::debug!("reshuffled, {} cards back in the deck", self.deck.len());
    }
}

// claim arbitration.
impl Dealer {
    /// Service the oldest pending claim, if any. Holds the claimant's
    /// mailbox lock throughout so the player cannot race its own claim.
    /// A claim whose pick list changed since submission is rejected without
    /// consulting the judge. Reports whether a claim was serviced.
    pub(crate) fn check(&mut self) -> bool {
        let id = match self.pit.collect() {
            None => return false,
            Some(id) => id,
        };
        let player = self.players[id].clone();
        player.resolve(|| self.decide(id));
        if self.deck.is_empty() && self.judge.matches_in(&self.table.board(), 1).is_empty() {
            log::info!("no matches left anywhere, game over");
            self.finished = true;
        }
        true
    }

    fn decide(&mut self, id: Position) -> Verdict {
        let picks = self.table.picks_of(id);
        if picks.len() != self.config.match_size
            || picks.iter().any(|&card| self.table.slot_of(card).is_none())
        {
            log::debug!("P{} claim went stale", id);
            return Verdict::Rejected;
        }
        match self.judge.is_legal_match(&picks) {
            false => Verdict::Rejected,
            true => {
                for card in picks {
                    if let Some(slot) = self.table.slot_of(card) {
                        let _guard = self.table.guard(slot);
                        self.table.remove_card(slot);
                    }
                }
                self.reset_timer();
                Verdict::Matched
            }
        }
    }
}

// thread lifecycle.
impl Dealer {
    /// Start one control thread per player, recording creation order for
    /// shutdown. Robots spawn their own simulator inside `Player::run`.
    pub(crate) fn spawn(&mut self) {
        for player in &self.players {
            let id = player.id();
            let unit = player.clone();
            let handle = std::thread::Builder::new()
                .name(format!("player-{}", id))
                .spawn(move || unit.run())
                .expect("spawn player thread");
            self.handles[id] = Some(handle);
            self.stack.push(id);
        }
    }

    /// Pop the creation-order stack: stop then join each player before
    /// touching the next, strictly reverse of creation.
    pub(crate) fn shutdown(&mut self) {
        self.pit.stop();
        while let Some(id) = self.stack.pop() {
            self.players[id].stop();
            if let Some(handle) = self.handles[id].take() {
                let _ = handle.join();
            }
        }
    }

    /// Top score takes it; ties share the win.
    pub(crate) fn announce_winners(&self) {
        let top = self.players.iter().map(|p| p.score()).max().unwrap_or(0);
        let winners = self
            .players
            .iter()
            .filter(|p| p.score() == top)
            .map(|p| p.id())
            .collect::<Vec<_>>();
        log::info!("final scores in, winners: {:?}", winners);
        self.ui.announce_winners(&winners);
    }
}
