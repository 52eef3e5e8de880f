//! Play Binary
//!
//! Runs a game of Set in the terminal: robots play themselves, humans type
//! grid keys on stdin. Type q (or close stdin) to stop the game.

use clap::Parser;
use setpit::cards::SetRules;
use setpit::config::Config;
use setpit::game::Engine;
use setpit::ui::Console;
use std::sync::Arc;

/// Keyboard grids, one per supported human, row-major over the 12 slots.
const KEYS: [&str; 2] = ["qwerasdfzxcv", "uiopjkl;m,./"];

#[derive(Parser, Debug)]
#[command(about = "threaded real-time Set game")]
struct Args {
    /// Human players, keyed from stdin
    #[arg(long, default_value_t = 0)]
    humans: usize,
    /// Simulated players
    #[arg(long, default_value_t = 2)]
    robots: usize,
    /// Round length in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
    /// Freeze after a confirmed match, in seconds
    #[arg(long, default_value_t = 1)]
    point_freeze: u64,
    /// Freeze after a rejected match, in seconds
    #[arg(long, default_value_t = 3)]
    penalty_freeze: u64,
    /// Log every legal set after each deal
    #[arg(long, default_value_t = false)]
    hints: bool,
}

fn main() -> anyhow::Result<()> {
    setpit::log();
    let args = Args::parse();
    anyhow::ensure!(args.humans + args.robots > 0, "nobody at the table");
    anyhow::ensure!(args.humans <= KEYS.len(), "only {} keyboard grids", KEYS.len());
    let config = Config {
        humans: args.humans,
        robots: args.robots,
        timeout_millis: args.timeout * 1_000,
        point_freeze_millis: args.point_freeze * 1_000,
        penalty_freeze_millis: args.penalty_freeze * 1_000,
        hints: args.hints,
        ..Config::default()
    };
    let judge = Arc::new(SetRules::new(config.features, config.match_size));
    let engine = Engine::new(config.clone(), judge, Arc::new(Console));
    keyboard(&engine, &config);
    engine.run();
    Ok(())
}

/// Route stdin characters to human players' slot presses. Each human owns
/// one grid from KEYS; q requests stop. The thread dies with the process
/// once the engine returns.
fn keyboard(engine: &Engine, config: &Config) {
    let pit = engine.pit();
    let humans = (0..config.humans)
        .map(|id| engine.player(id))
        .collect::<Vec<_>>();
    std::thread::spawn(move || {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Err(_) | Ok(0) => break pit.stop(),
                Ok(_) => {
                    for key in buffer.trim().chars() {
                        if key == 'q' {
                            return pit.stop();
                        }
                        for (id, human) in humans.iter().enumerate() {
                            if let Some(slot) = KEYS[id].find(key) {
                                human.press(slot);
                            }
                        }
                    }
                }
            }
        }
    });
}
