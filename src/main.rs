use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use carnival_scores::config::{Config, Transport};
use carnival_scores::export;
use carnival_scores::roster::{self, Roster};
use carnival_scores::scoreboard::{RefreshOutcome, Scoreboard};
use carnival_scores::sheet::{CsvSource, SheetSource};
use carnival_scores::submission;
use carnival_scores::ScoringMethod;

#[derive(Parser)]
#[command(name = "carnival-scores")]
#[command(about = "Rank carnival game scores kept in a spreadsheet", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Settings {
    /// JSON configuration file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Spreadsheet id from the sheet's URL
    #[arg(long, global = true, env = "CARNIVAL_SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// API key for the values transport
    #[arg(long, global = true, env = "CARNIVAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Script endpoint that accepts score submissions
    #[arg(long, global = true, env = "CARNIVAL_SCRIPT_URL")]
    script_url: Option<String>,

    /// Entries shown per game
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Read endpoint for remote sheets
    #[arg(long, global = true, value_enum)]
    transport: Option<Transport>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank game sheets saved as CSV files
    Rank {
        /// Directory holding one <game>.csv per game
        #[arg(long)]
        csv_dir: PathBuf,

        /// Game to rank (repeatable); defaults to every CSV in the directory
        #[arg(long)]
        game: Vec<String>,
    },

    /// Fetch and print the live leaderboard
    Show {
        /// Game to show (repeatable); defaults to the games list
        #[arg(long)]
        game: Vec<String>,
    },

    /// Write rankings to a .csv or .xlsx file
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Read local CSV sheets instead of the remote spreadsheet
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Game to export (repeatable)
        #[arg(long)]
        game: Vec<String>,
    },

    /// Validate and submit a score
    Submit {
        #[arg(long)]
        game: String,

        #[arg(long)]
        participant: String,

        /// Single score value (points or MM:SS)
        #[arg(long, conflicts_with_all = ["time", "points"])]
        score: Option<String>,

        /// Elapsed MM:SS for timer-and-points games
        #[arg(long, requires = "points")]
        time: Option<String>,

        /// Points for timer-and-points games
        #[arg(long, requires = "time")]
        points: Option<String>,

        /// Scoring method used to validate the entry
        #[arg(long, default_value = "points")]
        method: String,
    },

    /// Register a participant with the script endpoint
    Register {
        #[arg(long)]
        game: String,

        #[arg(long)]
        participant: String,

        /// Link to the participant's photo
        #[arg(long, default_value = "")]
        photo_url: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli.settings)?;

    match cli.command {
        Commands::Rank { csv_dir, game } => {
            let board = rank_local(&config, &csv_dir, &game)?;
            print_board(&board);
        }
        Commands::Show { game } => {
            let board = rank_remote(&config, &game)?;
            print_board(&board);
        }
        Commands::Export { output, csv_dir, game } => {
            let board = match csv_dir {
                Some(dir) => rank_local(&config, &dir, &game)?,
                None => rank_remote(&config, &game)?,
            };
            export_board(&board, &output)?;
        }
        Commands::Submit {
            game,
            participant,
            score,
            time,
            points,
            method,
        } => {
            submit(&config, &game, &participant, score, time, points, &method)?;
        }
        Commands::Register {
            game,
            participant,
            photo_url,
        } => {
            register(&config, &game, &participant, &photo_url)?;
        }
    }

    Ok(())
}

fn load_config(settings: &Settings) -> Result<Config> {
    let mut config = match &settings.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(id) = &settings.spreadsheet_id {
        config.spreadsheet_id = id.clone();
    }
    if let Some(key) = &settings.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(url) = &settings.script_url {
        config.script_url = Some(url.clone());
    }
    if let Some(n) = settings.top_n {
        config.top_n = n;
    }
    if let Some(transport) = settings.transport {
        config.transport = transport;
    }

    config.validate()?;
    Ok(config)
}

/// Every `<name>.csv` in the directory except the roster and games list
fn csv_games(dir: &Path, config: &Config) -> Result<Vec<String>> {
    let mut games = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if stem != config.participants_sheet && stem != config.games_sheet {
                games.push(stem.to_string());
            }
        }
    }
    games.sort();
    Ok(games)
}

fn load_roster(source: &dyn SheetSource, config: &Config) -> Roster {
    match Roster::fetch(source, &config.participants_sheet) {
        Ok(roster) => roster,
        Err(e) => {
            println!("Warning: Failed to load participants: {}", e);
            script_roster(config).unwrap_or_default()
        }
    }
}

/// Participant list from the script endpoint, when one is configured
fn script_roster(config: &Config) -> Option<Roster> {
    let client = config.script_client().ok()?;
    match client.fetch_roster(None) {
        Ok(roster) => {
            println!("Loaded {} participants from the script endpoint", roster.len());
            Some(roster)
        }
        Err(e) => {
            println!("Warning: Failed to fetch participants: {}", e);
            None
        }
    }
}

fn rank_local(config: &Config, dir: &Path, games: &[String]) -> Result<Scoreboard> {
    let source = CsvSource::new(dir);

    let games = if games.is_empty() {
        match roster::fetch_games(&source, &config.games_sheet) {
            Ok(list) if !list.is_empty() => list.into_iter().map(|g| g.name).collect(),
            _ => csv_games(dir, config)?,
        }
    } else {
        games.to_vec()
    };
    if games.is_empty() {
        bail!("No game sheets found in {}", dir.display());
    }

    let roster = load_roster(&source, config);
    refresh(&source, &games, &roster, config)
}

fn rank_remote(config: &Config, games: &[String]) -> Result<Scoreboard> {
    let source = config.sheet_source()?;

    let games = if games.is_empty() {
        println!("Fetching games list: {}", config.games_sheet);
        let list = roster::fetch_games(source.as_ref(), &config.games_sheet)
            .context("Failed to fetch games list")?;
        list.into_iter().map(|g| g.name).collect()
    } else {
        games.to_vec()
    };
    if games.is_empty() {
        bail!("The games list is empty");
    }

    let roster = load_roster(source.as_ref(), config);
    refresh(source.as_ref(), &games, &roster, config)
}

fn refresh(source: &dyn SheetSource, games: &[String], roster: &Roster, config: &Config) -> Result<Scoreboard> {
    let mut board = Scoreboard::new();
    for (game, outcome) in board.refresh_all(source, games, roster, config.top_n) {
        if outcome == RefreshOutcome::NoData && board.get(&game).is_none() {
            println!("Warning: Could not load {}", game);
        }
    }
    Ok(board)
}

fn print_board(board: &Scoreboard) {
    for ranking in board.rankings() {
        println!("{}", ranking);
    }
}

fn export_board(board: &Scoreboard, output: &Path) -> Result<()> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    println!("Writing {}", output.display());
    match ext.as_str() {
        "csv" => export::write_rankings_to_csv(board.rankings(), output)?,
        "xlsx" => export::write_rankings_to_xlsx(board.rankings(), output)?,
        _ => bail!("Unsupported output format: {} (use .csv or .xlsx)", ext),
    }
    println!("Done!");
    Ok(())
}

fn submit(
    config: &Config,
    game: &str,
    participant: &str,
    score: Option<String>,
    time: Option<String>,
    points: Option<String>,
    method: &str,
) -> Result<()> {
    if participant.trim().is_empty() {
        bail!("Participant name is empty");
    }

    let value = match (score, time, points) {
        (Some(score), None, None) => submission::single_score(&score, ScoringMethod::from_name(method))?,
        (None, Some(time), Some(points)) => submission::time_and_points_score(&time, &points)?,
        _ => bail!("Give either --score, or --time together with --points"),
    };

    let client = config.script_client()?;
    client
        .add_score(game.trim(), participant.trim(), &value)
        .with_context(|| format!("Failed to submit score for {}", participant))?;
    println!("Submitted score for {} in {}", participant.trim(), game.trim());
    Ok(())
}

fn register(config: &Config, game: &str, participant: &str, photo_url: &str) -> Result<()> {
    if participant.trim().is_empty() {
        bail!("Participant name is empty");
    }

    let client = config.script_client()?;
    client
        .add_participant(game.trim(), participant.trim(), photo_url)
        .with_context(|| format!("Failed to register {}", participant))?;
    println!("Registered {} for {}", participant.trim(), game.trim());
    Ok(())
}
