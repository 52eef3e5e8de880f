pub mod dealer;
pub use dealer::*;

pub mod engine;
pub use engine::*;

pub mod pit;
pub use pit::*;

pub mod player;
pub use player::*;
