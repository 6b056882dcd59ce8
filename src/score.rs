//! Score normalization: turning weakly-typed cells into comparable rank keys
//!
//! Every raw value is classified into exactly one [`ParsedScore`] shape, tried in
//! a fixed priority order (first match wins):
//!
//! 1. date-tuple `Date(Y,M,D,H,Mi,S)` as returned for time-of-day cells
//! 2. legacy composite `MM:SS - N pts`
//! 3. plain `MM:SS`
//! 4. plain number
//! 5. anything else, including empty
//!
//! Rank keys sort descending: bigger is better. Times are negated so that a
//! faster time produces a bigger key.
//!
//! Date-tuples need reinterpreting. Booth operators type "MM:SS" into cells the
//! spreadsheet treats as "HH:MM", so the hour component holds minutes and the
//! minute component holds seconds. The trailing seconds component is ignored.

use crate::model::{format_number, Cell, ScoreDisplay};
use lazy_static::lazy_static;
use nom::{
    bytes::complete::tag_no_case,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    multi::separated_list1,
    sequence::delimited,
    IResult, Parser,
};
use regex::Regex;

/// Weight that lets points dominate any elapsed-time difference
pub const POINTS_WEIGHT: f64 = 10_000.0;

lazy_static! {
    static ref CLOCK: Regex = Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap();
    static ref CLOCK_AND_POINTS: Regex =
        Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*-\s*(\d+)\s*pts?$").unwrap();
    static ref NUMERIC: Regex = Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").unwrap();
}

/// Elapsed time as minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub minutes: u32,
    pub seconds: u32,
}

impl ClockTime {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        self.minutes as u64 * 60 + self.seconds as u64
    }

    /// Zero-padded "MM:SS"
    pub fn to_clock_string(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// A raw cell classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedScore {
    /// `Date(Y,M,D,H,Mi,S)` reinterpreted as `H` minutes, `Mi` seconds
    DateTuple(ClockTime),
    /// Legacy `MM:SS - N pts` encoding of a time-and-points result
    ClockAndPoints { time: ClockTime, points: u64 },
    /// Plain `MM:SS`; `text` is the trimmed original
    Clock { time: ClockTime, text: String },
    /// Plain number; `text` is the trimmed original
    Numeric { value: f64, text: String },
    /// Empty or unrecognized
    Unscored,
}

fn tuple_component(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>()).parse(input)
}

fn date_tuple(input: &str) -> IResult<&str, Vec<u32>> {
    delimited(
        tag_no_case("Date("),
        separated_list1(char(','), tuple_component),
        char(')'),
    )
    .parse(input)
}

/// Parse the exact six-component date-tuple form
pub fn parse_date_tuple(s: &str) -> Option<ClockTime> {
    let (_, parts) = all_consuming(date_tuple).parse(s.trim()).ok()?;
    if parts.len() != 6 {
        return None;
    }
    Some(ClockTime::new(parts[3], parts[4]))
}

fn parse_clock(s: &str) -> Option<ClockTime> {
    let caps = CLOCK.captures(s)?;
    let minutes = caps[1].parse().ok()?;
    let seconds = caps[2].parse().ok()?;
    Some(ClockTime::new(minutes, seconds))
}

fn parse_clock_and_points(s: &str) -> Option<(ClockTime, u64)> {
    let caps = CLOCK_AND_POINTS.captures(s)?;
    let minutes = caps[1].parse().ok()?;
    let seconds = caps[2].parse().ok()?;
    let points = caps[3].parse().ok()?;
    Some((ClockTime::new(minutes, seconds), points))
}

fn parse_numeric(s: &str) -> Option<f64> {
    if !NUMERIC.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Classify a raw text value
pub fn parse_text(raw: &str) -> ParsedScore {
    let s = raw.trim();
    if s.is_empty() {
        return ParsedScore::Unscored;
    }
    if let Some(time) = parse_date_tuple(s) {
        return ParsedScore::DateTuple(time);
    }
    if let Some((time, points)) = parse_clock_and_points(s) {
        return ParsedScore::ClockAndPoints { time, points };
    }
    if let Some(time) = parse_clock(s) {
        return ParsedScore::Clock {
            time,
            text: s.to_string(),
        };
    }
    if let Some(value) = parse_numeric(s) {
        return ParsedScore::Numeric {
            value,
            text: s.to_string(),
        };
    }
    ParsedScore::Unscored
}

/// Classify a cell
pub fn parse_score(cell: &Cell) -> ParsedScore {
    match cell {
        Cell::Empty => ParsedScore::Unscored,
        Cell::Number(n) if n.is_finite() => ParsedScore::Numeric {
            value: *n,
            text: format_number(*n),
        },
        Cell::Number(_) => ParsedScore::Unscored,
        Cell::Text(s) => parse_text(s),
    }
}

impl ParsedScore {
    pub fn rank_key(&self) -> f64 {
        match self {
            ParsedScore::DateTuple(time) | ParsedScore::Clock { time, .. } => {
                -(time.total_seconds() as f64)
            }
            ParsedScore::ClockAndPoints { time, points } => {
                *points as f64 * POINTS_WEIGHT - time.total_seconds() as f64
            }
            ParsedScore::Numeric { value, .. } => *value,
            ParsedScore::Unscored => 0.0,
        }
    }

    /// Human-readable value without a label.
    ///
    /// The legacy composite shows only its points here; its time is carried by
    /// [`ParsedScore::score_display`] as a separate value.
    pub fn display_value(&self) -> String {
        match self {
            ParsedScore::DateTuple(time) => time.to_clock_string(),
            ParsedScore::ClockAndPoints { points, .. } => points.to_string(),
            ParsedScore::Clock { text, .. } | ParsedScore::Numeric { text, .. } => text.clone(),
            ParsedScore::Unscored => "0".to_string(),
        }
    }

    /// True for date-tuples and plain "MM:SS"; chooses the "Time:" label only
    pub fn is_time_shaped(&self) -> bool {
        matches!(self, ParsedScore::DateTuple(_) | ParsedScore::Clock { .. })
    }

    pub fn score_display(&self) -> ScoreDisplay {
        match self {
            ParsedScore::ClockAndPoints { time, points } => ScoreDisplay::PointsAndTime {
                points: points.to_string(),
                time: time.to_clock_string(),
            },
            _ if self.is_time_shaped() => ScoreDisplay::Time {
                value: self.display_value(),
            },
            _ => ScoreDisplay::Points {
                value: self.display_value(),
            },
        }
    }
}

pub fn rank_key(cell: &Cell) -> f64 {
    parse_score(cell).rank_key()
}

pub fn display_value(cell: &Cell) -> String {
    parse_score(cell).display_value()
}

pub fn is_time_shaped(cell: &Cell) -> bool {
    parse_score(cell).is_time_shaped()
}

/// Elapsed seconds from a dedicated time-taken cell.
///
/// Accepts a date-tuple or "MM:SS"; a bare number is taken as seconds.
/// Anything else counts as zero.
pub fn elapsed_seconds(cell: &Cell) -> f64 {
    match parse_score(cell) {
        ParsedScore::DateTuple(time) | ParsedScore::Clock { time, .. } => time.total_seconds() as f64,
        ParsedScore::Numeric { value, .. } => value,
        ParsedScore::ClockAndPoints { .. } | ParsedScore::Unscored => 0.0,
    }
}

/// Display form of a dedicated time-taken cell
pub fn elapsed_display(cell: &Cell) -> String {
    match parse_score(cell) {
        ParsedScore::ClockAndPoints { time, .. } => time.to_clock_string(),
        parsed => parsed.display_value(),
    }
}

/// Plain numeric parse of a points cell, zero when unparseable
pub fn points_value(cell: &Cell) -> f64 {
    match parse_score(cell) {
        ParsedScore::Numeric { value, .. } => value,
        _ => 0.0,
    }
}

/// Rank key for a sheet with dedicated time-taken and points-scored columns
pub fn time_and_points_key(time_taken: &Cell, points_scored: &Cell) -> f64 {
    points_value(points_scored) * POINTS_WEIGHT - elapsed_seconds(time_taken)
}

/// Display for a sheet with dedicated time-taken and points-scored columns
pub fn time_and_points_display(time_taken: &Cell, points_scored: &Cell) -> ScoreDisplay {
    ScoreDisplay::PointsAndTime {
        points: format_number(points_value(points_scored)),
        time: elapsed_display(time_taken),
    }
}
