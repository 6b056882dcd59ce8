//! Runtime configuration, loadable from a JSON file

use crate::error::{Result, ScoreboardError};
use crate::script::ScriptClient;
use crate::sheet::{GvizClient, SheetSource, ValuesClient};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Which read endpoint game sheets are fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Public columnar query endpoint, no key needed
    #[default]
    Gviz,
    /// REST values endpoint, needs an API key
    Values,
}

fn default_participants_sheet() -> String {
    "Participants".to_string()
}

fn default_games_sheet() -> String {
    "GamesList".to_string()
}

fn default_top_n() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub script_url: Option<String>,
    #[serde(default = "default_participants_sheet")]
    pub participants_sheet: String,
    #[serde(default = "default_games_sheet")]
    pub games_sheet: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub transport: Transport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            api_key: None,
            script_url: None,
            participants_sheet: default_participants_sheet(),
            games_sheet: default_games_sheet(),
            top_n: default_top_n(),
            transport: Transport::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(ScoreboardError::Config("topN must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Remote sheet source for the configured transport
    pub fn sheet_source(&self) -> Result<Box<dyn SheetSource>> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ScoreboardError::Config("no spreadsheet id configured".to_string()));
        }
        self.validate()?;
        let source: Box<dyn SheetSource> = match self.transport {
            Transport::Gviz => Box::new(GvizClient::new(&self.spreadsheet_id)?),
            Transport::Values => {
                let key = self.api_key.as_deref().unwrap_or("").trim();
                if key.is_empty() {
                    return Err(ScoreboardError::Config(
                        "the values transport needs an API key".to_string(),
                    ));
                }
                Box::new(ValuesClient::new(&self.spreadsheet_id, key)?)
            }
        };
        Ok(source)
    }

    pub fn script_client(&self) -> Result<ScriptClient> {
        match self.script_url.as_deref() {
            Some(url) if !url.trim().is_empty() => ScriptClient::new(url.trim()),
            _ => Err(ScoreboardError::Config("no script URL configured".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json_str(r#"{"spreadsheetId":"abc"}"#).unwrap();
        assert_eq!(config.spreadsheet_id, "abc");
        assert_eq!(config.participants_sheet, "Participants");
        assert_eq!(config.games_sheet, "GamesList");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.transport, Transport::Gviz);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carnival.json");
        fs::write(
            &path,
            r#"{"spreadsheetId":"abc","apiKey":"k","scriptUrl":"https://script.example/exec","topN":3,"transport":"values","gamesSheet":"Games"}"#,
        )
        .unwrap();
        let config = Config::from_json_file(&path).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.transport, Transport::Values);
        assert_eq!(config.games_sheet, "Games");
        assert!(config.sheet_source().is_ok());
        assert!(config.script_client().is_ok());
    }

    #[test]
    fn test_validate() {
        let config = Config {
            top_n: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ScoreboardError::Config(_))));

        let config = Config {
            spreadsheet_id: "abc".to_string(),
            transport: Transport::Values,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.sheet_source().is_err());
        assert!(Config::default().sheet_source().is_err());
        assert!(Config::default().script_client().is_err());
    }
}
