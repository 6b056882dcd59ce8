pub mod cell;
pub mod game;
pub mod ranking;

pub use cell::{format_number, Cell};
pub use game::{GameInfo, ScoringMethod};
pub use ranking::{GameRanking, ParticipantEntry, ScoreDisplay, ScoringMode};
