//! Checks applied to a score before it is sent to the script endpoint

use crate::error::{Result, ScoreboardError};
use crate::model::ScoringMethod;
use crate::script::ScoreValue;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STOPWATCH_ENTRY: Regex = Regex::new(r"^\d{2}:\d{2}$").unwrap();
}

/// Validate a raw score entry for the game's scoring method.
///
/// Timed methods take an exact `MM:SS` entry; everything else takes a
/// non-negative number.
pub fn validate_entry(value: &str, method: ScoringMethod) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScoreboardError::InvalidEntry("score is empty".to_string()));
    }

    if method.is_timed() {
        if !STOPWATCH_ENTRY.is_match(value) {
            return Err(ScoreboardError::InvalidEntry(format!(
                "{:?} is not a MM:SS time",
                value
            )));
        }
        return Ok(());
    }

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(()),
        Ok(_) => Err(ScoreboardError::InvalidEntry(format!(
            "{:?} must be zero or more",
            value
        ))),
        Err(_) => Err(ScoreboardError::InvalidEntry(format!(
            "{:?} is not a number",
            value
        ))),
    }
}

/// Stopwatch reading in zero-padded `MM:SS`
pub fn format_clock(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Validate and package a single-value score
pub fn single_score(value: &str, method: ScoringMethod) -> Result<ScoreValue> {
    validate_entry(value, method)?;
    Ok(ScoreValue::Single(value.trim().to_string()))
}

/// Validate and package a timed points score (elapsed `MM:SS` plus points)
pub fn time_and_points_score(time_taken: &str, points_scored: &str) -> Result<ScoreValue> {
    validate_entry(time_taken, ScoringMethod::Stopwatch)?;
    validate_entry(points_scored, ScoringMethod::Points)?;
    Ok(ScoreValue::TimeAndPoints {
        time_taken: time_taken.trim().to_string(),
        points_scored: points_scored.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_points() {
        assert!(validate_entry("12", ScoringMethod::Points).is_ok());
        assert!(validate_entry("0", ScoringMethod::MultiplePoints).is_ok());
        assert!(validate_entry(" 7.5 ", ScoringMethod::TimerAndPoints).is_ok());
        assert!(validate_entry("-1", ScoringMethod::Points).is_err());
        assert!(validate_entry("ten", ScoringMethod::Points).is_err());
        assert!(validate_entry("", ScoringMethod::Points).is_err());
    }

    #[test]
    fn test_validate_timed() {
        assert!(validate_entry("01:30", ScoringMethod::Stopwatch).is_ok());
        assert!(validate_entry("00:05", ScoringMethod::TimeRace).is_ok());
        assert!(validate_entry("1:30", ScoringMethod::Stopwatch).is_err());
        assert!(validate_entry("90", ScoringMethod::TimeRace).is_err());
        assert!(validate_entry("01:30:00", ScoringMethod::Stopwatch).is_err());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn test_score_builders() {
        assert_eq!(
            single_score(" 4 ", ScoringMethod::Points).unwrap(),
            ScoreValue::Single("4".to_string())
        );
        assert!(single_score("4", ScoringMethod::Stopwatch).is_err());
        assert_eq!(
            time_and_points_score("00:50", "18").unwrap(),
            ScoreValue::TimeAndPoints {
                time_taken: "00:50".to_string(),
                points_scored: "18".to_string()
            }
        );
        assert!(time_and_points_score("50", "18").is_err());
    }
}
