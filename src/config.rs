use std::time::Duration;

/// Read-only game configuration, fixed for the lifetime of an engine.
///
/// Durations are stored in milliseconds so the struct stays plain data;
/// accessor methods hand out [`Duration`] where the engine wants one.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Number of human players (ids `0..humans`).
    pub humans: usize,
    /// Number of simulated players (ids `humans..humans + robots`).
    pub robots: usize,
    /// Number of slots on the table.
    pub table_size: usize,
    /// Number of distinct cards in the deck.
    pub deck_size: usize,
    /// Features per card (4 in the standard game).
    pub features: usize,
    /// Cards per legal match, and the action queue / token capacity (3).
    pub match_size: usize,
    /// Round length before a forced reshuffle.
    pub timeout_millis: u64,
    /// Remaining time at which the countdown turns urgent.
    pub warning_millis: u64,
    /// Freeze after a confirmed match.
    pub point_freeze_millis: u64,
    /// Freeze after a rejected match.
    pub penalty_freeze_millis: u64,
    /// Simulated render delay per card placement or removal.
    pub delay_millis: u64,
    /// Log every legal set on the table after each deal.
    pub hints: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            humans: 0,
            robots: 2,
            table_size: 12,
            deck_size: 81,
            features: 4,
            match_size: 3,
            timeout_millis: 60_000,
            warning_millis: 10_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            delay_millis: 50,
            hints: false,
        }
    }
}

impl Config {
    pub fn players(&self) -> usize {
        self.humans + self.robots
    }
    pub fn is_human(&self, id: crate::Position) -> bool {
        id < self.humans
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
    pub fn warning(&self) -> Duration {
        Duration::from_millis(self.warning_millis)
    }
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }

    /// Instant variant for tests and scripted scenarios:
    /// no render delay, no freezes, no simulators to race against.
    #[cfg(test)]
    pub fn bare(players: usize) -> Self {
        Self {
            humans: players,
            robots: 0,
            delay_millis: 0,
            point_freeze_millis: 0,
            penalty_freeze_millis: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let config = Config::default();
        assert!(config.deck_size == config.match_size.pow(config.features as u32));
        assert!(config.players() == config.humans + config.robots);
        assert!(config.warning() < config.timeout());
    }

    #[test]
    fn human_ids_come_first() {
        let config = Config {
            humans: 1,
            robots: 2,
            ..Config::default()
        };
        assert!(config.is_human(0) == true);
        assert!(config.is_human(1) == false);
        assert!(config.is_human(2) == false);
    }
}
