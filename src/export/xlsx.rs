use crate::error::Result;
use crate::model::{GameRanking, ScoreDisplay};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

const MAX_SHEET_NAME: usize = 31;

/// Write a summary sheet followed by one worksheet per game
pub fn write_rankings_to_xlsx(rankings: &[GameRanking], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    write_summary_sheet(summary, rankings)?;

    let mut used: HashSet<String> = HashSet::new();
    used.insert("leaderboard".to_string());

    for ranking in rankings {
        let name = unique_sheet_name(&ranking.game_name, &mut used);
        let worksheet = workbook.add_worksheet();
        write_game_sheet(worksheet, ranking)?;
        worksheet.set_name(&name)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Make a game name acceptable as a worksheet name
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    // Trim after truncating: the cut can expose a trailing apostrophe
    let truncated: String = cleaned.trim().chars().take(MAX_SHEET_NAME).collect();
    let trimmed = trim_sheet_name(&truncated);
    if trimmed.is_empty() {
        "Game".to_string()
    } else {
        trimmed.to_string()
    }
}

// Worksheet names may not start or end with an apostrophe
fn trim_sheet_name(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\'')
}

// Worksheet names are compared case-insensitively
fn unique_sheet_name(game_name: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(game_name);
    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        let head: String = base.chars().take(keep).collect();
        candidate = format!("{}{}", trim_sheet_name(&head), suffix);
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

fn write_summary_sheet(sheet: &mut Worksheet, rankings: &[GameRanking]) -> Result<()> {
    sheet.set_column_width(0, 24)?; // Game
    sheet.set_column_width(1, 14)?; // Mode
    sheet.set_column_width(2, 20)?; // Leader
    sheet.set_column_width(3, 24)?; // Score
    sheet.set_column_width(4, 9)?; // Entries

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);

    let headers = ["Game", "Mode", "Leader", "Score", "Entries"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);

    for (row_idx, ranking) in rankings.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string(row, 0, &ranking.game_name)?;
        sheet.write_string_with_format(row, 1, ranking.mode.label(), &center_format)?;
        match ranking.leader() {
            Some(leader) => {
                sheet.write_string(row, 2, &leader.name)?;
                sheet.write_string(row, 3, leader.display.to_string())?;
            }
            None => {
                sheet.write_string(row, 2, "No data available")?;
            }
        }
        sheet.write_number_with_format(row, 4, ranking.len() as f64, &center_format)?;
    }

    sheet.set_name("Leaderboard")?;
    Ok(())
}

fn write_game_sheet(sheet: &mut Worksheet, ranking: &GameRanking) -> Result<()> {
    sheet.set_column_width(0, 6)?; // Rank
    sheet.set_column_width(1, 22)?; // Participant
    sheet.set_column_width(2, 12)?; // Points
    sheet.set_column_width(3, 12)?; // Time
    sheet.set_column_width(4, 36)?; // Photo

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);

    let headers = ["Rank", "Participant", "Points", "Time", "Photo"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);

    if ranking.is_empty() {
        sheet.write_string(1, 1, "No data available")?;
        return Ok(());
    }

    for (idx, entry) in ranking.entries.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number_with_format(row, 0, (idx + 1) as f64, &center_format)?;
        sheet.write_string(row, 1, &entry.name)?;

        let (points, time) = display_columns(&entry.display);
        if let Some(points) = points {
            sheet.write_string_with_format(row, 2, points, &center_format)?;
        }
        if let Some(time) = time {
            sheet.write_string_with_format(row, 3, time, &center_format)?;
        }

        if !entry.photo_ref.is_empty() {
            sheet.write_string(row, 4, &entry.photo_ref)?;
        }
    }

    Ok(())
}

fn display_columns(display: &ScoreDisplay) -> (Option<&str>, Option<&str>) {
    match display {
        ScoreDisplay::Points { value } => (Some(value.as_str()), None),
        ScoreDisplay::Time { value } => (None, Some(value.as_str())),
        ScoreDisplay::PointsAndTime { points, time } => (Some(points.as_str()), Some(time.as_str())),
    }
}
