//! Per-game ranking: resolve columns, score every row, stable sort, take top N

use crate::columns::ColumnMap;
use crate::model::{Cell, GameRanking, ParticipantEntry, ScoringMode};
use crate::roster::Roster;
use crate::score::{parse_score, time_and_points_display, time_and_points_key};
use crate::sheet::Sheet;
use log::debug;
use std::cmp::Ordering;

static EMPTY_CELL: Cell = Cell::Empty;

fn cell_at(row: &[Cell], idx: Option<usize>) -> &Cell {
    idx.and_then(|i| row.get(i)).unwrap_or(&EMPTY_CELL)
}

/// Rank one game's rows.
///
/// Rows with a blank name are skipped. Malformed score cells rank as zero and
/// never abort the sheet. Equal rank keys keep their input order.
pub fn compute_rankings<S: AsRef<str>>(
    game_name: &str,
    headers: &[S],
    rows: &[Vec<Cell>],
    roster: &Roster,
    top_n: usize,
) -> GameRanking {
    let columns = ColumnMap::from_headers(headers);
    let time_and_points = columns.has_time_and_points();

    let mut all_time_shaped = true;
    let mut entries: Vec<ParticipantEntry> = Vec::new();

    for row in rows {
        let name = cell_at(row, columns.name).to_text();
        if name.is_empty() {
            continue;
        }

        let (rank_key, display) = if time_and_points {
            let time = cell_at(row, columns.time_taken);
            let points = cell_at(row, columns.points_scored);
            (
                time_and_points_key(time, points),
                time_and_points_display(time, points),
            )
        } else {
            let parsed = parse_score(cell_at(row, columns.score));
            all_time_shaped &= parsed.is_time_shaped();
            (parsed.rank_key(), parsed.score_display())
        };

        let sheet_photo = cell_at(row, columns.photo).to_text();
        let photo_ref = if sheet_photo.is_empty() {
            roster.photo_for(&name).unwrap_or_default().to_string()
        } else {
            sheet_photo
        };

        entries.push(ParticipantEntry {
            name,
            rank_key,
            display,
            photo_ref,
        });
    }

    let mode = if time_and_points {
        ScoringMode::TimeAndPoints
    } else if !entries.is_empty() && all_time_shaped {
        ScoringMode::TimeOnly
    } else {
        ScoringMode::Points
    };

    debug!(
        "{}: {} ranked rows of {} ({:?})",
        game_name,
        entries.len(),
        rows.len(),
        mode
    );

    // sort_by is stable
    entries.sort_by(|a, b| b.rank_key.partial_cmp(&a.rank_key).unwrap_or(Ordering::Equal));
    entries.truncate(top_n);

    GameRanking {
        game_name: game_name.to_string(),
        mode,
        entries,
    }
}

/// Rank a fetched sheet under its own name
pub fn rank_sheet(sheet: &Sheet, roster: &Roster, top_n: usize) -> GameRanking {
    compute_rankings(&sheet.name, &sheet.headers, &sheet.rows, roster, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoreDisplay;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from_text(c)).collect()
    }

    fn names(ranking: &GameRanking) -> Vec<&str> {
        ranking.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_time_only_scenario() {
        let rows = vec![row(&["Amy", "01:30"]), row(&["Bo", "00:45"]), row(&["", "00:10"])];
        let ranking = compute_rankings("Maze", &["Name", "Score"], &rows, &Roster::new(), 5);
        assert_eq!(names(&ranking), vec!["Bo", "Amy"]);
        assert_eq!(ranking.mode, ScoringMode::TimeOnly);
        assert_eq!(ranking.entries[0].rank_key, -45.0);
        assert_eq!(
            ranking.entries[0].display,
            ScoreDisplay::Time {
                value: "00:45".to_string()
            }
        );
    }

    #[test]
    fn test_blank_name_excluded_regardless_of_score() {
        let rows = vec![row(&["Cy", ""]), row(&["  ", "999"])];
        let ranking = compute_rankings("Toss", &["Name", "Score"], &rows, &Roster::new(), 5);
        assert_eq!(names(&ranking), vec!["Cy"]);
    }

    #[test]
    fn test_mixed_shapes_per_row() {
        let rows = vec![row(&["Dee", "3"]), row(&["Eve", "Date(1899,11,30,0,6,10)"])];
        let ranking = compute_rankings("Mixed", &["Name", "Score"], &rows, &Roster::new(), 5);
        assert_eq!(names(&ranking), vec!["Dee", "Eve"]);
        assert_eq!(ranking.entries[0].rank_key, 3.0);
        assert_eq!(ranking.entries[1].rank_key, -6.0);
        assert_eq!(ranking.mode, ScoringMode::Points);
        assert_eq!(
            ranking.entries[1].display,
            ScoreDisplay::Time {
                value: "00:06".to_string()
            }
        );
    }

    #[test]
    fn test_time_and_points_scenario() {
        let headers = ["ParticipantName", "TimeTaken", "PointsScored", "DateTime"];
        let rows = vec![
            row(&["Fay", "01:00", "12", "2025-01-01"]),
            row(&["Gus", "00:50", "18", "2025-01-01"]),
        ];
        let ranking = compute_rankings("Circus", &headers, &rows, &Roster::new(), 5);
        assert_eq!(ranking.mode, ScoringMode::TimeAndPoints);
        assert_eq!(names(&ranking), vec!["Gus", "Fay"]);
        assert_eq!(ranking.entries[0].rank_key, 179950.0);
        assert_eq!(ranking.entries[1].rank_key, 119940.0);
        assert_eq!(
            ranking.entries[0].display,
            ScoreDisplay::PointsAndTime {
                points: "18".to_string(),
                time: "00:50".to_string()
            }
        );
    }

    #[test]
    fn test_stable_on_ties() {
        let rows = vec![
            row(&["First", "10"]),
            row(&["Second", "20"]),
            row(&["Third", "10"]),
            row(&["Fourth", "10.0"]),
        ];
        let ranking = compute_rankings("Ties", &["Name", "Score"], &rows, &Roster::new(), 10);
        assert_eq!(names(&ranking), vec!["Second", "First", "Third", "Fourth"]);
    }

    #[test]
    fn test_zero_keys_tie_with_zero_time() {
        // -0.0 from a 00:00 time must tie with a blank score, keeping input order
        let rows = vec![row(&["Blank", ""]), row(&["Instant", "00:00"])];
        let ranking = compute_rankings("Zero", &["Name", "Score"], &rows, &Roster::new(), 10);
        assert_eq!(names(&ranking), vec!["Blank", "Instant"]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let rows: Vec<Vec<Cell>> = (1..=8)
            .map(|i| row(&[format!("P{}", i).as_str(), i.to_string().as_str()]))
            .collect();
        let ranking = compute_rankings("Tower", &["Name", "Score"], &rows, &Roster::new(), 5);
        assert_eq!(ranking.len(), 5);
        assert_eq!(names(&ranking), vec!["P8", "P7", "P6", "P5", "P4"]);
    }

    #[test]
    fn test_empty_sheet_is_empty_ranking() {
        let ranking = compute_rankings::<&str>("Nothing", &[], &[], &Roster::new(), 5);
        assert!(ranking.is_empty());
        assert_eq!(ranking.mode, ScoringMode::Points);
    }

    #[test]
    fn test_short_rows_and_missing_columns() {
        // no score header matches, so column 1 is guessed; a short row scores zero
        let rows = vec![row(&["Hal"]), row(&["Ida", "4"])];
        let ranking = compute_rankings("Guess", &["Who", "Result"], &rows, &Roster::new(), 5);
        assert_eq!(names(&ranking), vec!["Ida", "Hal"]);
        assert_eq!(ranking.entries[1].rank_key, 0.0);
    }

    #[test]
    fn test_photo_from_roster() {
        let mut roster = Roster::new();
        roster.insert("Amy", "https://photos.example/amy.jpg");
        let rows = vec![row(&["  AMY ", "5"]), row(&["Bo", "4"])];
        let ranking = compute_rankings("Hoops", &["Name", "Score"], &rows, &roster, 5);
        assert_eq!(ranking.entries[0].name, "AMY");
        assert_eq!(ranking.entries[0].photo_ref, "https://photos.example/amy.jpg");
        assert_eq!(ranking.entries[1].photo_ref, "");
    }

    #[test]
    fn test_numeric_cells_from_query_protocol() {
        let rows = vec![
            vec![Cell::Text("Jo".to_string()), Cell::Number(7.0)],
            vec![Cell::Text("Kai".to_string()), Cell::Number(9.5)],
        ];
        let ranking = compute_rankings("Darts", &["Name", "Score"], &rows, &Roster::new(), 5);
        assert_eq!(names(&ranking), vec!["Kai", "Jo"]);
        assert_eq!(
            ranking.entries[1].display,
            ScoreDisplay::Points {
                value: "7".to_string()
            }
        );
    }
}
