pub mod self_play;

pub use self_play::{play_game, GameRecord, TrainingExample};
