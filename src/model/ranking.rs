//! Ranked output handed to whatever renders the leaderboard

use serde::Serialize;
use std::fmt;

/// How a game sheet is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoringMode {
    /// Higher numeric value ranks better
    Points,
    /// Lower elapsed time ranks better
    TimeOnly,
    /// Points rank first, lower elapsed time breaks ties
    TimeAndPoints,
}

impl ScoringMode {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringMode::Points => "Points",
            ScoringMode::TimeOnly => "Time",
            ScoringMode::TimeAndPoints => "Points & Time",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A score already formatted for direct display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScoreDisplay {
    Points { value: String },
    Time { value: String },
    /// Points and time shown as two separate labelled values
    PointsAndTime { points: String, time: String },
}

impl ScoreDisplay {
    /// One labelled line per displayed value
    pub fn lines(&self) -> Vec<String> {
        match self {
            ScoreDisplay::Points { value } => vec![format!("Points: {}", value)],
            ScoreDisplay::Time { value } => vec![format!("Time: {}", value)],
            ScoreDisplay::PointsAndTime { points, time } => {
                vec![format!("Points: {}", points), format!("Time: {}", time)]
            }
        }
    }
}

impl fmt::Display for ScoreDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("  "))
    }
}

/// One participant's result in one game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantEntry {
    pub name: String,
    pub rank_key: f64,
    pub display: ScoreDisplay,
    pub photo_ref: String,
}

/// Top-N leaderboard for a single game, rebuilt on every fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRanking {
    pub game_name: String,
    pub mode: ScoringMode,
    pub entries: Vec<ParticipantEntry>,
}

impl GameRanking {
    pub fn empty(game_name: &str, mode: ScoringMode) -> Self {
        Self {
            game_name: game_name.to_string(),
            mode,
            entries: Vec::new(),
        }
    }

    /// An empty ranking means "no data", not an error
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn leader(&self) -> Option<&ParticipantEntry> {
        self.entries.first()
    }
}

impl fmt::Display for GameRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.game_name.to_uppercase(), self.mode)?;
        if self.entries.is_empty() {
            return writeln!(f, "  No data available");
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            writeln!(f, "  {}. {}  {}", idx + 1, entry.name, entry.display)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_display_lines() {
        let display = ScoreDisplay::PointsAndTime {
            points: "18".to_string(),
            time: "00:50".to_string(),
        };
        assert_eq!(display.lines(), vec!["Points: 18", "Time: 00:50"]);
    }

    #[test]
    fn test_ranking_display() {
        let ranking = GameRanking {
            game_name: "Corn Hole".to_string(),
            mode: ScoringMode::Points,
            entries: vec![ParticipantEntry {
                name: "Dee".to_string(),
                rank_key: 3.0,
                display: ScoreDisplay::Points {
                    value: "3".to_string(),
                },
                photo_ref: String::new(),
            }],
        };
        assert_eq!(ranking.to_string(), "CORN HOLE (Points)\n  1. Dee  Points: 3\n");
    }

    #[test]
    fn test_empty_ranking() {
        let ranking = GameRanking::empty("Maze", ScoringMode::TimeOnly);
        assert!(ranking.is_empty());
        assert!(ranking.leader().is_none());
    }
}
