//! Participant roster and games list, both read from ordinary sheets

use crate::columns::{resolve, resolve_field, Field, MatchMode};
use crate::error::Result;
use crate::model::{GameInfo, ScoringMethod};
use crate::sheet::{Sheet, SheetSource};
use log::{debug, info};
use std::collections::HashMap;

fn roster_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Name to photo reference lookup, case-insensitive on the name
#[derive(Debug, Clone, Default)]
pub struct Roster {
    photos: HashMap<String, String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, photo_ref: &str) {
        self.photos.insert(roster_key(name), photo_ref.trim().to_string());
    }

    /// Photo for a participant; `None` when unknown or registered without one
    pub fn photo_for(&self, name: &str) -> Option<&str> {
        self.photos
            .get(&roster_key(name))
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.photos.contains_key(&roster_key(name))
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Build from a participants sheet. Later rows override earlier ones.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let name_col = resolve_field(&sheet.headers, Field::Name);
        let photo_col = resolve_field(&sheet.headers, Field::Photo);

        let mut roster = Roster::new();
        for row in &sheet.rows {
            let name = name_col
                .and_then(|i| row.get(i))
                .map(|c| c.to_text())
                .unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let photo = photo_col
                .and_then(|i| row.get(i))
                .map(|c| c.to_text())
                .unwrap_or_default();
            roster.insert(&name, &photo);
        }
        debug!("Roster {:?}: {} participants", sheet.name, roster.len());
        roster
    }

    pub fn fetch(source: &dyn SheetSource, sheet_name: &str) -> Result<Self> {
        let sheet = source.fetch_sheet(sheet_name)?;
        let roster = Roster::from_sheet(&sheet);
        info!("Loaded {} participants from {:?}", roster.len(), sheet_name);
        Ok(roster)
    }
}

/// Games named in the first column of the games list sheet
pub fn games_from_sheet(sheet: &Sheet) -> Vec<GameInfo> {
    let desc_col = resolve(&sheet.headers, &["Description"], MatchMode::Fuzzy);
    let method_col = resolve(
        &sheet.headers,
        &["ScoringMethod", "Scoring Method", "Method"],
        MatchMode::Fuzzy,
    );

    sheet
        .rows
        .iter()
        .filter_map(|row| {
            let name = row.first().map(|c| c.to_text()).unwrap_or_default();
            if name.is_empty() {
                return None;
            }
            let text_at = |col: Option<usize>| {
                col.and_then(|i| row.get(i))
                    .map(|c| c.to_text())
                    .unwrap_or_default()
            };
            Some(GameInfo {
                name,
                description: text_at(desc_col),
                scoring_method: ScoringMethod::from_name(&text_at(method_col)),
            })
        })
        .collect()
}

pub fn fetch_games(source: &dyn SheetSource, sheet_name: &str) -> Result<Vec<GameInfo>> {
    let sheet = source.fetch_sheet(sheet_name)?;
    let games = games_from_sheet(&sheet);
    info!("Loaded {} games from {:?}", games.len(), sheet_name);
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> Sheet {
        Sheet::new(
            "T",
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from_text(c)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_roster_lookup_is_case_insensitive() {
        let s = sheet(
            &["Name", "PhotoUrl", "Timestamp"],
            &[
                &["Amy Lee", "https://p/amy.jpg", "2025-03-01"],
                &["", "https://p/ghost.jpg", ""],
                &["Bo", "", ""],
            ],
        );
        let roster = Roster::from_sheet(&s);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.photo_for("  amy LEE"), Some("https://p/amy.jpg"));
        assert!(roster.contains("bo"));
        assert_eq!(roster.photo_for("Bo"), None);
        assert_eq!(roster.photo_for("Cy"), None);
    }

    #[test]
    fn test_roster_without_photo_column() {
        let s = sheet(&["Participant", "Timestamp"], &[&["Amy", "2025-03-01"]]);
        let roster = Roster::from_sheet(&s);
        assert!(roster.contains("amy"));
        assert_eq!(roster.photo_for("amy"), None);
    }

    #[test]
    fn test_games_from_sheet() {
        let s = sheet(
            &["Name", "Description", "ScoringMethod"],
            &[
                &["Maze", "Fastest wins", "stopwatch"],
                &["  ", "ignored", "points"],
                &["Circus", "", "timerAndPoints"],
                &["Hoops", "", "mystery"],
            ],
        );
        let games = games_from_sheet(&s);
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].name, "Maze");
        assert_eq!(games[0].description, "Fastest wins");
        assert_eq!(games[0].scoring_method, ScoringMethod::Stopwatch);
        assert_eq!(games[1].scoring_method, ScoringMethod::TimerAndPoints);
        assert_eq!(games[2].scoring_method, ScoringMethod::Points);
    }

    #[test]
    fn test_games_name_column_only() {
        let s = sheet(&["Games"], &[&["Darts"], &["Toss"]]);
        let games = games_from_sheet(&s);
        assert_eq!(games, vec![GameInfo::new("Darts"), GameInfo::new("Toss")]);
    }
}
