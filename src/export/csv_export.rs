use crate::error::Result;
use crate::model::GameRanking;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    game: &'a str,
    rank: usize,
    participant: &'a str,
    rank_key: f64,
    display: String,
    photo: &'a str,
}

/// Write every ranked entry as one CSV record, games in the given order
pub fn write_rankings_csv<W: Write>(rankings: &[GameRanking], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut wrote_any = false;

    for ranking in rankings {
        for (idx, entry) in ranking.entries.iter().enumerate() {
            wtr.serialize(RankingRow {
                game: &ranking.game_name,
                rank: idx + 1,
                participant: &entry.name,
                rank_key: entry.rank_key,
                display: entry.display.to_string(),
                photo: &entry.photo_ref,
            })?;
            wrote_any = true;
        }
    }

    // serialize() only emits headers alongside the first record
    if !wrote_any {
        wtr.write_record(["game", "rank", "participant", "rank_key", "display", "photo"])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rankings_to_csv(rankings: &[GameRanking], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_rankings_csv(rankings, file)
}
