pub mod algorithm;
pub mod hyperparameters;
pub mod mcts_result;
pub mod node;
pub mod parallel;
pub mod selection;

pub use algorithm::{terminal_value, RootNoise, MCTS};
pub use hyperparameters::MCTSHyperparameters;
pub use mcts_result::{LeafResult, PathStep, SearchResult};
pub use node::NodeStats;
