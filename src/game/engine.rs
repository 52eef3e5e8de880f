use super::dealer::Dealer;
use super::pit::Pit;
use super::player::Player;
use crate::Position;
use crate::cards::Judge;
use crate::config::Config;
use crate::table::Table;
use crate::ui::Ui;
use std::sync::Arc;

/// Wires a table, player units, and a dealer into a runnable game.
/// The dealer loop runs on the calling thread; players get their own.
pub struct Engine {
    pit: Arc<Pit>,
    players: Vec<Arc<Player>>,
    dealer: Dealer,
}

impl Engine {
    pub fn new(config: Config, judge: Arc<dyn Judge>, ui: Arc<dyn Ui>) -> Self {
        let pit = Arc::new(Pit::new());
        let table = Arc::new(Table::new(&config, ui.clone()));
        let players = (0..config.players())
            .map(|id| Arc::new(Player::new(id, &config, table.clone(), pit.clone(), ui.clone())))
            .collect::<Vec<_>>();
        let dealer = Dealer::new(config, table, pit.clone(), ui, judge, players.clone());
        Self {
            pit,
            players,
            dealer,
        }
    }

    /// Stop handle: callable from any thread, any number of times.
    pub fn pit(&self) -> Arc<Pit> {
        self.pit.clone()
    }

    /// Input edge for one player, for routing external key presses.
    pub fn player(&self, id: Position) -> Arc<Player> {
        self.players[id].clone()
    }

    /// Run the game to completion on the calling thread.
    pub fn run(self) {
        self.dealer.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SetRules;
    use crate::ui::Quiet;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Display that records winner announcements.
    #[derive(Default)]
    struct Tape(Mutex<Vec<Vec<Position>>>);
    impl Ui for Tape {
        fn place_card(&self, _: crate::Card, _: crate::Slot) {}
        fn remove_card(&self, _: crate::Slot) {}
        fn place_token(&self, _: Position, _: crate::Slot) {}
        fn remove_token(&self, _: Position, _: crate::Slot) {}
        fn set_score(&self, _: Position, _: crate::Score) {}
        fn set_countdown(&self, _: Duration, _: bool) {}
        fn set_freeze(&self, _: Position, _: Option<Duration>) {}
        fn announce_winners(&self, winners: &[Position]) {
            self.0.lock().expect("tape poisoned").push(winners.to_vec());
        }
    }

    #[test]
    fn stop_request_tears_down_cleanly() {
        let config = Config {
            humans: 0,
            robots: 2,
            delay_millis: 0,
            point_freeze_millis: 0,
            penalty_freeze_millis: 0,
            timeout_millis: 400,
            ..Config::default()
        };
        let engine = Engine::new(config, Arc::new(SetRules::default()), Arc::new(Quiet));
        let pit = engine.pit();
        let game = std::thread::spawn(move || engine.run());
        std::thread::sleep(Duration::from_millis(250));
        pit.stop();
        game.join().expect("dealer thread exits cleanly");
    }

    #[test]
    fn tiny_game_plays_out_and_announces() {
        // 2 features x 3 options: nine cards, all on the table at once, so
        // the whole game is three confirmed matches away from exhaustion
        let config = Config {
            humans: 0,
            robots: 2,
            table_size: 9,
            deck_size: 9,
            features: 2,
            match_size: 3,
            delay_millis: 0,
            point_freeze_millis: 0,
            penalty_freeze_millis: 0,
            timeout_millis: 500,
            ..Config::default()
        };
        let judge = Arc::new(SetRules::new(2, 3));
        let tape = Arc::new(Tape::default());
        let engine = Engine::new(config, judge, tape.clone());
        let players = vec![engine.player(0), engine.player(1)];
        std::thread::spawn(move || engine.run())
            .join()
            .expect("game runs to exhaustion");
        let seen = tape.0.lock().expect("tape poisoned");
        assert!(seen.len() == 1);
        assert!(!seen[0].is_empty());
        // two or three confirmed matches, depending on whether the last
        // three cards happened to form a line
        let scored = players.iter().map(|p| p.score()).sum::<usize>();
        assert!(scored == 2 || scored == 3);
        let top = players.iter().map(|p| p.score()).max().expect("two players");
        for winner in &seen[0] {
            assert!(players[*winner].score() == top);
        }
    }
}
