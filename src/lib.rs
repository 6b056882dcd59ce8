pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod ranking;
pub mod roster;
pub mod score;
pub mod scoreboard;
pub mod script;
pub mod sheet;
pub mod submission;

pub use error::{Result, ScoreboardError};
pub use model::*;
pub use ranking::compute_rankings;
