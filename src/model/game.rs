use serde::Deserialize;
use std::fmt;

/// How scores are captured at the game booth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum ScoringMethod {
    #[default]
    Points,
    MultiplePoints,
    Stopwatch,
    TimeRace,
    TimerAndPoints,
}

impl ScoringMethod {
    /// Parse a scoring method name, falling back to plain points
    pub fn from_name(s: &str) -> ScoringMethod {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "multiplepoints" => ScoringMethod::MultiplePoints,
            "stopwatch" => ScoringMethod::Stopwatch,
            "timerace" => ScoringMethod::TimeRace,
            "timerandpoints" => ScoringMethod::TimerAndPoints,
            _ => ScoringMethod::Points,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoringMethod::Points => "Points",
            ScoringMethod::MultiplePoints => "Multiple Points",
            ScoringMethod::Stopwatch => "Time (MM:SS)",
            ScoringMethod::TimeRace => "Race Time (MM:SS)",
            ScoringMethod::TimerAndPoints => "Timer & Points",
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, ScoringMethod::Stopwatch | ScoringMethod::TimeRace)
    }
}

impl From<String> for ScoringMethod {
    fn from(s: String) -> Self {
        ScoringMethod::from_name(&s)
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An entry from the games list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scoring_method: ScoringMethod,
}

impl GameInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            scoring_method: ScoringMethod::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_method_names() {
        assert_eq!(ScoringMethod::from_name("stopwatch"), ScoringMethod::Stopwatch);
        assert_eq!(ScoringMethod::from_name("timeRace"), ScoringMethod::TimeRace);
        assert_eq!(
            ScoringMethod::from_name("timerAndPoints"),
            ScoringMethod::TimerAndPoints
        );
        assert_eq!(
            ScoringMethod::from_name("Multiple Points"),
            ScoringMethod::MultiplePoints
        );
        assert_eq!(ScoringMethod::from_name("bogus"), ScoringMethod::Points);
    }

    #[test]
    fn test_game_info_from_script_json() {
        let game: GameInfo = serde_json::from_str(
            r#"{"id": 4, "name": "Turbo Racing", "description": "Race", "scoringMethod": "timeRace"}"#,
        )
        .unwrap();
        assert_eq!(game.name, "Turbo Racing");
        assert_eq!(game.scoring_method, ScoringMethod::TimeRace);
    }
}
