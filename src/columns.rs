//! Header-row column resolution
//!
//! Game sheets are maintained by hand, so column labels drift ("Name",
//! "Participant Name", "ParticipantName"...). Common fields are located with a
//! forgiving substring match; the dedicated time-taken and points-scored columns
//! use an exact match so a stray "Points" column never switches a sheet into
//! time-and-points scoring.

/// How header labels are compared against candidate names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Lower-cased and trimmed; equality or substring containment
    Fuzzy,
    /// Lower-cased with all whitespace removed; equality only
    Exact,
}

/// Semantic field slots a game or roster sheet can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Score,
    TimeTaken,
    PointsScored,
    Photo,
}

impl Field {
    /// Candidate labels in priority order
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Field::Name => &["ParticipantName", "Name", "Participant"],
            Field::Score => &["Score", "Points"],
            Field::TimeTaken => &["TimeTaken", "Time Taken", "Time"],
            Field::PointsScored => &["PointsScored", "Points Scored"],
            Field::Photo => &["PhotoUrl", "Photo URL", "Photo", "URL", "PhotoURL"],
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        match self {
            Field::TimeTaken | Field::PointsScored => MatchMode::Exact,
            Field::Name | Field::Score | Field::Photo => MatchMode::Fuzzy,
        }
    }

    /// Positional guess used when a fuzzy field matches nothing
    fn fallback(&self) -> Option<usize> {
        match self {
            Field::Name => Some(0),
            Field::Score => Some(1),
            // Column 0 is the name column on every roster, so guessing it would
            // hand out names as photo references.
            Field::Photo => None,
            Field::TimeTaken | Field::PointsScored => None,
        }
    }
}

fn normalize(s: &str, mode: MatchMode) -> String {
    match mode {
        MatchMode::Fuzzy => s.trim().to_lowercase(),
        MatchMode::Exact => s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase(),
    }
}

/// Find the column for the first candidate that matches any header.
///
/// Candidates are tried in priority order; for each one the headers are scanned
/// left to right and the earliest match wins. No positional fallback is applied.
pub fn resolve<S: AsRef<str>>(headers: &[S], candidates: &[&str], mode: MatchMode) -> Option<usize> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| normalize(h.as_ref(), mode))
        .collect();

    for candidate in candidates {
        let wanted = normalize(candidate, mode);
        if wanted.is_empty() {
            continue;
        }
        let found = normalized.iter().position(|header| match mode {
            MatchMode::Fuzzy => header == &wanted || header.contains(&wanted),
            MatchMode::Exact => header == &wanted,
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Resolve a field with its own candidates and match mode, applying the
/// positional fallback for fuzzy fields
pub fn resolve_field<S: AsRef<str>>(headers: &[S], field: Field) -> Option<usize> {
    resolve(headers, field.candidates(), field.match_mode()).or_else(|| field.fallback())
}

/// Column indices for one sheet's header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub score: Option<usize>,
    pub time_taken: Option<usize>,
    pub points_scored: Option<usize>,
    pub photo: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            name: resolve_field(headers, Field::Name),
            score: resolve_field(headers, Field::Score),
            time_taken: resolve_field(headers, Field::TimeTaken),
            points_scored: resolve_field(headers, Field::PointsScored),
            photo: resolve_field(headers, Field::Photo),
        }
    }

    /// Both dedicated columns present: the sole trigger for time-and-points scoring
    pub fn has_time_and_points(&self) -> bool {
        self.time_taken.is_some() && self.points_scored.is_some()
    }
}
