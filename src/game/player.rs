use super::pit::Pit;
use crate::FREEZE_TICK;
use crate::Position;
use crate::Score;
use crate::Slot;
use crate::config::Config;
use crate::table::Table;
use crate::ui::Ui;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

/// Dealer's answer to a completed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Matched,
    Rejected,
}

/// One player unit: a control thread that turns pressed slots into token
/// toggles, plus (for robots) a simulator thread that generates presses.
///
/// The action queue is bounded at the match size. The consumer parks on
/// `keys` while the queue is empty; the simulator parks on `gate` while the
/// queue is full, the table is mid-reshuffle, or the player is frozen. Both
/// condvars pair with the `actions` mutex. Completing a selection enqueues a
/// claim with the dealer and blocks on `ruling` until the verdict lands in
/// the mailbox; the dealer holds the mailbox lock while validating, so the
/// player cannot race ahead of its own claim.
pub struct Player {
    id: Position,
    human: bool,
    capacity: usize,
    point_freeze: Duration,
    penalty_freeze: Duration,
    table: Arc<Table>,
    pit: Arc<Pit>,
    ui: Arc<dyn Ui>,
    halt: AtomicBool,
    frozen: AtomicBool,
    score: AtomicUsize,
    actions: Mutex<VecDeque<Slot>>,
    keys: Condvar,
    gate: Condvar,
    mailbox: Mutex<Option<Verdict>>,
    ruling: Condvar,
    snooze: Mutex<()>,
    alarm: Condvar,
}

impl Player {
    pub fn new(
        id: Position,
        config: &Config,
        table: Arc<Table>,
        pit: Arc<Pit>,
        ui: Arc<dyn Ui>,
    ) -> Self {
        Self {
            id,
            human: config.is_human(id),
            capacity: config.match_size,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            table,
            pit,
            ui,
            halt: AtomicBool::new(false),
            frozen: AtomicBool::new(false),
            score: AtomicUsize::new(0),
            actions: Mutex::new(VecDeque::new()),
            keys: Condvar::new(),
            gate: Condvar::new(),
            mailbox: Mutex::new(None),
            ruling: Condvar::new(),
            snooze: Mutex::new(()),
            alarm: Condvar::new(),
        }
    }

    pub fn id(&self) -> Position {
        self.id
    }
    pub fn is_human(&self) -> bool {
        self.human
    }
    pub fn score(&self) -> Score {
        self.score.load(Ordering::Acquire)
    }
    pub fn pending(&self) -> usize {
        self.lock().len()
    }
    fn halted(&self) -> bool {
        self.halt.load(Ordering::Acquire)
    }
    fn lock(&self) -> MutexGuard<'_, VecDeque<Slot>> {
        self.actions.lock().expect("action queue poisoned")
    }
}

// input edge. called from the key-press source or the simulator thread.
impl Player {
    /// A key was pressed for this player. Dropped silently while the table
    /// is mid-reshuffle, the player is frozen, the queue is at capacity, or
    /// the slot is empty; otherwise enqueued, waking a parked consumer.
    pub fn press(&self, slot: Slot) {
        if self.pit.reshuffling() || self.pit.stopped() {
            return;
        }
        if self.frozen.load(Ordering::Acquire) {
            return;
        }
        if self.table.card_at(slot).is_none() {
            return;
        }
        let mut actions = self.lock();
        if actions.len() < self.capacity {
            actions.push_back(slot);
            self.keys.notify_all();
        }
    }

    /// Drop every queued action. Dealer calls this on reshuffle; the unit
    /// calls it on itself entering a freeze. Wakes a simulator parked on a
    /// full queue.
    pub fn flush(&self) {
        self.lock().clear();
        self.gate.notify_all();
    }

    /// Nudge a parked simulator to re-check the world (new deal, thaw).
    pub fn rouse(&self) {
        let _actions = self.lock();
        self.gate.notify_all();
    }
}

// control thread.
impl Player {
    /// Main loop. Parks until input arrives, toggles tokens one action at a
    /// time under the slot guard, and claims a verification once the pick
    /// list fills. Exits on stop, joining the simulator first.
    pub fn run(self: Arc<Self>) {
        log::info!("P{} thread starting", self.id);
        let simulator = match self.human {
            true => None,
            false => Some(self.clone().simulate()),
        };
        while let Some(slot) = self.next() {
            self.act(slot);
            self.gate.notify_all();
        }
        if let Some(simulator) = simulator {
            let _ = simulator.join();
        }
        log::info!("P{} thread terminated", self.id);
    }

    /// Park until the queue is non-empty or stop is requested.
    fn next(&self) -> Option<Slot> {
        let mut actions = self.lock();
        while actions.is_empty() && !self.halted() {
            actions = self.keys.wait(actions).expect("action queue poisoned");
        }
        actions.pop_front()
    }

    /// Process one pressed slot: toggle the token under that slot's guard,
    /// then claim a verification if the selection just completed.
    pub(crate) fn act(&self, slot: Slot) {
        let complete = {
            let _guard = self.table.guard(slot);
            let picks = self.table.picks_of(self.id);
            match self.table.card_at(slot) {
                None => false,
                Some(card) if picks.contains(&card) => {
                    self.table.remove_token(self.id, slot);
                    false
                }
                Some(_) if picks.len() < self.capacity => {
                    self.table.place_token(self.id, slot);
                    // only the token that tops the list off starts a claim
                    self.table.picks_of(self.id).len() == self.capacity
                }
                Some(_) => false,
            }
        };
        if complete {
            log::debug!("P{} claims a match", self.id);
            self.pit.claim(self.id);
            match self.ruling() {
                Some(Verdict::Matched) => self.point(),
                Some(Verdict::Rejected) => self.penalty(),
                None => {} // halted mid-claim
            }
        }
    }

    /// Block until the dealer posts a verdict for this player's claim.
    pub(crate) fn ruling(&self) -> Option<Verdict> {
        let mut mailbox = self.mailbox.lock().expect("mailbox poisoned");
        while mailbox.is_none() && !self.halted() {
            mailbox = self.ruling.wait(mailbox).expect("mailbox poisoned");
        }
        mailbox.take()
    }

    /// Dealer side: decide and deliver the verdict while holding the
    /// mailbox lock, then wake the claimant.
    pub(crate) fn resolve<F>(&self, decide: F)
    where
        F: FnOnce() -> Verdict,
    {
        let mut mailbox = self.mailbox.lock().expect("mailbox poisoned");
        *mailbox = Some(decide());
        self.ruling.notify_all();
    }

    /// Confirmed match: score, report, flush, freeze.
    pub(crate) fn point(&self) {
        let score = self.score.fetch_add(1, Ordering::AcqRel) + 1;
        log::info!("P{} scored, total {}", self.id, score);
        self.ui.set_score(self.id, score);
        self.flush();
        self.freeze(self.point_freeze);
    }

    /// Rejected match: flush and sit out the longer freeze.
    pub(crate) fn penalty(&self) {
        log::info!("P{} penalized", self.id);
        self.flush();
        self.freeze(self.penalty_freeze);
    }

    /// Block this unit for `total`, reporting the remaining time at
    /// one-second granularity. Interruptible by stop.
    fn freeze(&self, total: Duration) {
        self.frozen.store(true, Ordering::Release);
        let mut left = total;
        while !left.is_zero() && !self.halted() {
            self.ui.set_freeze(self.id, Some(left));
            self.nap(left.min(FREEZE_TICK));
            left = left.saturating_sub(FREEZE_TICK);
        }
        self.ui.set_freeze(self.id, None);
        self.frozen.store(false, Ordering::Release);
        self.rouse();
    }

    /// Bounded interruptible sleep; stop rings the alarm.
    fn nap(&self, tick: Duration) {
        let start = Instant::now();
        let mut snooze = self.snooze.lock().expect("snooze poisoned");
        while start.elapsed() < tick && !self.halted() {
            let (guard, _) = self
                .alarm
                .wait_timeout(snooze, tick - start.elapsed())
                .expect("snooze poisoned");
            snooze = guard;
        }
    }

    /// Request this unit to terminate and wake every wait it could be
    /// parked in. The control thread joins the simulator on its way out.
    pub fn stop(&self) {
        self.halt.store(true, Ordering::Release);
        {
            let _actions = self.lock();
            self.keys.notify_all();
            self.gate.notify_all();
        }
        {
            let _mailbox = self.mailbox.lock().expect("mailbox poisoned");
            self.ruling.notify_all();
        }
        {
            let _snooze = self.snooze.lock().expect("snooze poisoned");
            self.alarm.notify_all();
        }
    }
}

// simulator thread, robots only.
impl Player {
    /// Repeatedly press a uniformly random slot while the table is live and
    /// the queue has room; otherwise park on the gate. The bounded wait
    /// covers wakeups nobody signals (reshuffle ending, thaw).
    fn simulate(self: Arc<Self>) -> std::thread::JoinHandle<()> {
        std::thread::Builder::new()
            .name(format!("sim-{}", self.id))
            .spawn(move || {
                log::info!("P{} simulator starting", self.id);
                while !self.halted() {
                    match self.eager() {
                        true => self.press(rand::rng().random_range(0..self.table.size())),
                        false => self.lull(),
                    }
                }
                log::info!("P{} simulator terminated", self.id);
            })
            .expect("spawn simulator thread")
    }

    fn eager(&self) -> bool {
        !self.pit.reshuffling()
            && !self.frozen.load(Ordering::Acquire)
            && self.pending() < self.capacity
    }

    fn lull(&self) {
        let mut actions = self.lock();
        while !self.halted()
            && (self.pit.reshuffling()
                || self.frozen.load(Ordering::Acquire)
                || actions.len() == self.capacity)
        {
            let (guard, timeout) = self
                .gate
                .wait_timeout(actions, crate::DEALER_TICK)
                .expect("action queue poisoned");
            actions = guard;
            if timeout.timed_out() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Quiet;

    fn rig() -> (Arc<Table>, Arc<Pit>, Player) {
        let config = Config::bare(2);
        let ui: Arc<dyn Ui> = Arc::new(Quiet);
        let table = Arc::new(Table::new(&config, ui.clone()));
        let pit = Arc::new(Pit::new());
        let player = Player::new(0, &config, table.clone(), pit.clone(), ui);
        (table, pit, player)
    }

    #[test]
    fn press_drops_during_reshuffle() {
        let (table, _pit, player) = rig();
        table.place_card(0, 0);
        player.press(0);
        assert!(player.pending() == 0);
    }

    #[test]
    fn press_drops_on_empty_slot() {
        let (_table, pit, player) = rig();
        pit.set_reshuffling(false);
        player.press(0);
        assert!(player.pending() == 0);
    }

    #[test]
    fn press_respects_capacity() {
        let (table, pit, player) = rig();
        for slot in 0..4 {
            table.place_card(slot, slot);
        }
        pit.set_reshuffling(false);
        for slot in 0..4 {
            player.press(slot);
        }
        assert!(player.pending() == 3);
    }

    #[test]
    fn press_drops_while_frozen() {
        let (table, pit, player) = rig();
        table.place_card(0, 0);
        pit.set_reshuffling(false);
        player.frozen.store(true, Ordering::Release);
        player.press(0);
        assert!(player.pending() == 0);
    }

    #[test]
    fn act_toggles_a_token() {
        let (table, pit, player) = rig();
        table.place_card(7, 3);
        pit.set_reshuffling(false);
        player.act(3);
        assert!(table.has_token(0, 3) == true);
        player.act(3);
        assert!(table.has_token(0, 3) == false);
        assert!(table.picks_of(0).is_empty());
    }

    #[test]
    fn point_scores_and_flushes() {
        let (table, pit, player) = rig();
        table.place_card(0, 0);
        pit.set_reshuffling(false);
        player.press(0);
        assert!(player.pending() == 1);
        player.point();
        assert!(player.score() == 1);
        assert!(player.pending() == 0);
    }

    #[test]
    fn penalty_flushes_without_scoring() {
        let (table, pit, player) = rig();
        table.place_card(0, 0);
        pit.set_reshuffling(false);
        player.press(0);
        player.penalty();
        assert!(player.score() == 0);
        assert!(player.pending() == 0);
    }

    #[test]
    fn ruling_returns_posted_verdict() {
        let (_table, _pit, player) = rig();
        player.resolve(|| Verdict::Matched);
        assert!(player.ruling() == Some(Verdict::Matched));
        player.stop();
        assert!(player.ruling() == None);
    }
}
