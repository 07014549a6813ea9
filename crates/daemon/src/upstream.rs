//! Clients for the two upstream race-data APIs.
//!
//! Every call follows the same steps: build the URL, GET it, reject non-2xx
//! answers, then cut the interesting subtree out of the body with
//! [`pitwall_core::json_path`]. Nothing is cached and nothing is retried.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pitwall_core::json_path;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

pub const DRIVER_STANDINGS_PATH: &str = "MRData.StandingsTable.StandingsLists.0.DriverStandings";
pub const CONSTRUCTOR_STANDINGS_PATH: &str =
    "MRData.StandingsTable.StandingsLists.0.ConstructorStandings";
pub const RACE_RESULTS_PATH: &str = "MRData.RaceTable.Races.0";
pub const CIRCUITS_PATH: &str = "MRData.CircuitTable.Circuits";
pub const CURRENT_RACES_PATH: &str = "races";

/// A championship year, or the running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Current,
    Year(u16),
}

impl FromStr for Season {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "current" {
            return Ok(Season::Current);
        }
        match s.parse::<u16>() {
            Ok(year) if s.len() == 4 && year >= 1950 => Ok(Season::Year(year)),
            _ => Err(ApiError::BadParam {
                what: "season",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Current => f.write_str("current"),
            Season::Year(y) => write!(f, "{y}"),
        }
    }
}

/// A round within a season, or the most recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    Last,
    Number(u32),
}

impl FromStr for Round {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "last" {
            return Ok(Round::Last);
        }
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Round::Number(n)),
            _ => Err(ApiError::BadParam {
                what: "round",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::Last => f.write_str("last"),
            Round::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    historical_base: String,
    current_base: String,
}

impl UpstreamClient {
    pub fn new(
        historical_base: &str,
        current_base: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pitwall/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            historical_base: historical_base.trim_end_matches('/').to_string(),
            current_base: current_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn driver_standings(&self, season: Season) -> Result<Value, ApiError> {
        let url = format!("{}/{season}/driverStandings.json", self.historical_base);
        self.fetch(&url, DRIVER_STANDINGS_PATH).await
    }

    pub async fn constructor_standings(&self, season: Season) -> Result<Value, ApiError> {
        let url = format!("{}/{season}/constructorStandings.json", self.historical_base);
        self.fetch(&url, CONSTRUCTOR_STANDINGS_PATH).await
    }

    pub async fn race_results(&self, season: Season, round: Round) -> Result<Value, ApiError> {
        let url = format!("{}/{season}/{round}/results.json", self.historical_base);
        self.fetch(&url, RACE_RESULTS_PATH).await
    }

    pub async fn circuits(&self, season: Season) -> Result<Value, ApiError> {
        let url = format!("{}/{season}/circuits.json", self.historical_base);
        self.fetch(&url, CIRCUITS_PATH).await
    }

    /// Full schedule of the running season, one entry per race weekend.
    pub async fn current_schedule(&self) -> Result<Value, ApiError> {
        let url = format!("{}/current", self.current_base);
        self.fetch(&url, CURRENT_RACES_PATH).await
    }

    pub async fn last_race_results(&self) -> Result<Value, ApiError> {
        let url = format!("{}/current/last/race", self.current_base);
        self.fetch(&url, CURRENT_RACES_PATH).await
    }

    async fn fetch(&self, url: &str, path: &str) -> Result<Value, ApiError> {
        debug!(url, "upstream request");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body: Value = resp.json().await?;
        json_path::take(body, path).ok_or_else(|| ApiError::UpstreamShape {
            url: url.to_string(),
            path: path.to_string(),
        })
    }
}
