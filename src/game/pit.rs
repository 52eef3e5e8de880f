use crate::Position;
use std::collections::VecDeque;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Coordination state shared between the dealer and every player.
///
/// The claim queue and its bell are the single condvar machinery dedicated
/// to dealer sleep/wake: the dealer dozes on the bell in bounded increments,
/// and a player completing a selection rings it. Claims resolve strictly
/// FIFO by arrival. The two flags have one writer (the dealer for
/// `reshuffling`, anyone for `stop`) and many readers.
pub struct Pit {
    stop: AtomicBool,
    reshuffling: AtomicBool,
    claims: Mutex<VecDeque<Position>>,
    bell: Condvar,
}

impl Default for Pit {
    fn default() -> Self {
        Self {
            stop: AtomicBool::new(false),
            // true until the first deal completes, so nobody acts on a bare table
            reshuffling: AtomicBool::new(true),
            claims: Mutex::new(VecDeque::new()),
            bell: Condvar::new(),
        }
    }
}

impl Pit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request game stop. Wakes the dozing dealer immediately.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
        let _claims = self.lock();
        self.bell.notify_all();
    }
    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Dealer-only writer. While raised, player input is dropped at the door.
    pub fn set_reshuffling(&self, on: bool) {
        self.reshuffling.store(on, Ordering::Release);
    }
    pub fn reshuffling(&self) -> bool {
        self.reshuffling.load(Ordering::Acquire)
    }

    /// Player side: enqueue a completed selection for verification
    /// and ring the dealer's bell.
    pub fn claim(&self, player: Position) {
        self.lock().push_back(player);
        self.bell.notify_all();
    }

    /// Dealer side: pop the oldest pending claim, if any.
    pub fn collect(&self) -> Option<Position> {
        self.lock().pop_front()
    }

    /// Dealer side: sleep for at most `tick`, returning early when a claim
    /// arrives or stop is requested. A spurious wake is a benign wake.
    pub fn doze(&self, tick: Duration) {
        let claims = self.lock();
        if claims.is_empty() && !self.stopped() {
            let _ = self
                .bell
                .wait_timeout(claims, tick)
                .expect("claim queue poisoned");
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Position>> {
        self.claims.lock().expect("claim queue poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_resolve_fifo() {
        let pit = Pit::new();
        pit.claim(2);
        pit.claim(0);
        pit.claim(1);
        assert!(pit.collect() == Some(2));
        assert!(pit.collect() == Some(0));
        assert!(pit.collect() == Some(1));
        assert!(pit.collect() == None);
    }

    #[test]
    fn doze_returns_at_once_with_pending_claim() {
        let pit = Pit::new();
        pit.claim(0);
        let start = std::time::Instant::now();
        pit.doze(Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn stop_is_sticky() {
        let pit = Pit::new();
        assert!(pit.stopped() == false);
        pit.stop();
        assert!(pit.stopped() == true);
        pit.doze(Duration::from_secs(5)); // must not block
    }

    #[test]
    fn reshuffling_starts_raised() {
        let pit = Pit::new();
        assert!(pit.reshuffling() == true);
        pit.set_reshuffling(false);
        assert!(pit.reshuffling() == false);
    }
}
