//! Write path: JSON requests to the spreadsheet's script endpoint
//!
//! Every request is a POST with an `action` discriminator; the endpoint answers
//! `{"success": true, ...}` or carries an `error` string.

use crate::error::{Result, ScoreboardError};
use crate::model::GameInfo;
use crate::roster::Roster;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

fn rfc3339<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// The score part of an `addScore` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreValue {
    Single(String),
    TimeAndPoints {
        time_taken: String,
        points_scored: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScriptRequest {
    #[serde(rename_all = "camelCase")]
    AddScore {
        game_name: String,
        participant_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_taken: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        points_scored: Option<String>,
        #[serde(serialize_with = "rfc3339")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    AddParticipant {
        game_name: String,
        participant_name: String,
        photo_url: String,
        #[serde(serialize_with = "rfc3339")]
        timestamp: DateTime<Utc>,
    },
    GetGames {
        #[serde(serialize_with = "rfc3339")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    GetParticipants {
        #[serde(skip_serializing_if = "Option::is_none")]
        game_name: Option<String>,
        #[serde(serialize_with = "rfc3339")]
        timestamp: DateTime<Utc>,
    },
}

impl ScriptRequest {
    pub fn add_score(game: &str, participant: &str, value: &ScoreValue, timestamp: DateTime<Utc>) -> Self {
        let (score, time_taken, points_scored) = match value {
            ScoreValue::Single(s) => (Some(s.clone()), None, None),
            ScoreValue::TimeAndPoints {
                time_taken,
                points_scored,
            } => (None, Some(time_taken.clone()), Some(points_scored.clone())),
        };
        ScriptRequest::AddScore {
            game_name: game.to_string(),
            participant_name: participant.to_string(),
            score,
            time_taken,
            points_scored,
            timestamp,
        }
    }

    pub fn add_participant(game: &str, participant: &str, photo_url: &str, timestamp: DateTime<Utc>) -> Self {
        ScriptRequest::AddParticipant {
            game_name: game.to_string(),
            participant_name: participant.to_string(),
            photo_url: photo_url.trim().to_string(),
            timestamp,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            ScriptRequest::AddScore { .. } => "addScore",
            ScriptRequest::AddParticipant { .. } => "addParticipant",
            ScriptRequest::GetGames { .. } => "getGames",
            ScriptRequest::GetParticipants { .. } => "getParticipants",
        }
    }
}

/// A registered participant as listed by the script
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    pub message: Option<String>,
    pub games: Option<Vec<GameInfo>>,
    pub participants: Option<Vec<ParticipantRecord>>,
}

impl ScriptResponse {
    /// Participant list as a roster; blank names are skipped
    pub fn roster(&self) -> Roster {
        let mut roster = Roster::new();
        for record in self.participants.iter().flatten() {
            if !record.name.trim().is_empty() {
                roster.insert(&record.name, &record.photo_url);
            }
        }
        roster
    }
}

/// Turn a decoded response into an error unless it reports success
pub fn check_response(response: ScriptResponse) -> Result<ScriptResponse> {
    if let Some(error) = &response.error {
        let detail = match &response.message {
            Some(m) => format!("{} ({})", error, m),
            None => error.clone(),
        };
        return Err(ScoreboardError::Script(detail));
    }
    if !response.success {
        return Err(ScoreboardError::Script(
            "endpoint did not report success".to_string(),
        ));
    }
    Ok(response)
}

pub struct ScriptClient {
    client: reqwest::blocking::Client,
    url: url::Url,
}

impl ScriptClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: url::Url::parse(url)?,
        })
    }

    pub fn send(&self, request: &ScriptRequest) -> Result<ScriptResponse> {
        info!("Sending {} to script endpoint", request.action());
        let response = self.client.post(self.url.clone()).json(request).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ScoreboardError::Script(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }
        debug!("Script response: {}", body);
        check_response(serde_json::from_str(&body)?)
    }

    pub fn add_score(&self, game: &str, participant: &str, value: &ScoreValue) -> Result<()> {
        self.send(&ScriptRequest::add_score(game, participant, value, Utc::now()))?;
        Ok(())
    }

    pub fn add_participant(&self, game: &str, participant: &str, photo_url: &str) -> Result<()> {
        self.send(&ScriptRequest::add_participant(game, participant, photo_url, Utc::now()))?;
        Ok(())
    }

    /// Registered participants; an absent list means nobody has registered
    pub fn fetch_roster(&self, game: Option<&str>) -> Result<Roster> {
        let response = self.send(&ScriptRequest::GetParticipants {
            game_name: game.map(str::to_string),
            timestamp: Utc::now(),
        })?;
        Ok(response.roster())
    }

    /// Games list as served by the script; an absent list means none configured
    pub fn fetch_games(&self) -> Result<Vec<GameInfo>> {
        let response = self.send(&ScriptRequest::GetGames { timestamp: Utc::now() })?;
        Ok(response.games.unwrap_or_default())
    }
}
