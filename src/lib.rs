//! Threaded real-time engine for the Set card game.
//!
//! A dealer thread deals cards onto a shared table, times each round, and
//! arbitrates match claims; each player runs on its own thread (robots get an
//! extra simulator thread) and races to place tokens on a legal set. All
//! coordination is plain OS threads, per-slot mutexes, and condition
//! variables.

pub mod cards;
pub mod config;
pub mod game;
pub mod table;
pub mod ui;

/// Card id in `[0, deck_size)`.
pub type Card = usize;
/// Slot index on the table, in `[0, table_size)`.
pub type Slot = usize;
/// Player id, assigned in creation order starting from 0.
pub type Position = usize;
/// Points scored by a player.
pub type Score = usize;

/// The dealer wakes at least this often to refresh the countdown,
/// even when no player rings the bell.
pub const DEALER_TICK: std::time::Duration = std::time::Duration::from_millis(100);
/// Freeze countdowns are reported to the display at this granularity.
pub const FREEZE_TICK: std::time::Duration = std::time::Duration::from_secs(1);

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
