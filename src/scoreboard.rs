//! The currently displayed rankings, replaced wholesale on every refresh

use crate::model::GameRanking;
use crate::ranking::rank_sheet;
use crate::roster::Roster;
use crate::sheet::SheetSource;
use log::{info, warn};

/// Result of refreshing one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A fresh, non-empty ranking replaced the old one
    Updated,
    /// The fetch failed or came back empty; the previous ranking is still shown
    KeptStale,
    /// Nothing to show, before or after
    NoData,
}

/// Latest ranking per game, in the order games were first seen.
///
/// A failed or empty refresh never blanks a game that already has data.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    rankings: Vec<GameRanking>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, game: &str) -> Option<&GameRanking> {
        self.rankings.iter().find(|r| r.game_name == game)
    }

    pub fn rankings(&self) -> &[GameRanking] {
        &self.rankings
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    /// Install a freshly computed ranking
    pub fn apply(&mut self, ranking: GameRanking) -> RefreshOutcome {
        let slot = self
            .rankings
            .iter()
            .position(|r| r.game_name == ranking.game_name);

        match slot {
            Some(idx) if ranking.is_empty() => {
                if self.rankings[idx].is_empty() {
                    RefreshOutcome::NoData
                } else {
                    info!("{}: empty result, keeping previous ranking", ranking.game_name);
                    RefreshOutcome::KeptStale
                }
            }
            Some(idx) => {
                self.rankings[idx] = ranking;
                RefreshOutcome::Updated
            }
            None => {
                let outcome = if ranking.is_empty() {
                    RefreshOutcome::NoData
                } else {
                    RefreshOutcome::Updated
                };
                self.rankings.push(ranking);
                outcome
            }
        }
    }

    /// Fetch, rank and install one game
    pub fn refresh(
        &mut self,
        source: &dyn SheetSource,
        game: &str,
        roster: &Roster,
        top_n: usize,
    ) -> RefreshOutcome {
        match source.fetch_sheet(game) {
            Ok(sheet) => self.apply(rank_sheet(&sheet, roster, top_n)),
            Err(e) => {
                warn!("{}: fetch failed: {}", game, e);
                match self.get(game) {
                    Some(prev) if !prev.is_empty() => RefreshOutcome::KeptStale,
                    _ => RefreshOutcome::NoData,
                }
            }
        }
    }

    /// Refresh every named game; one failing game does not affect the others
    pub fn refresh_all<S: AsRef<str>>(
        &mut self,
        source: &dyn SheetSource,
        games: &[S],
        roster: &Roster,
        top_n: usize,
    ) -> Vec<(String, RefreshOutcome)> {
        games
            .iter()
            .map(|g| {
                let game = g.as_ref();
                (game.to_string(), self.refresh(source, game, roster, top_n))
            })
            .collect()
    }
}
