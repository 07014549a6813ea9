use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Sessions a race weekend can carry, in the order they are iterated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionKey {
    #[serde(rename = "fp1")]
    FirstPractice,
    #[serde(rename = "fp2")]
    SecondPractice,
    #[serde(rename = "fp3")]
    ThirdPractice,
    #[serde(rename = "sprintQualy")]
    SprintQualifying,
    #[serde(rename = "sprintRace")]
    SprintRace,
    #[serde(rename = "qualy")]
    Qualifying,
    #[serde(rename = "race")]
    Race,
}

impl SessionKey {
    pub const ALL: [SessionKey; 7] = [
        SessionKey::FirstPractice,
        SessionKey::SecondPractice,
        SessionKey::ThirdPractice,
        SessionKey::SprintQualifying,
        SessionKey::SprintRace,
        SessionKey::Qualifying,
        SessionKey::Race,
    ];

    /// Wire name as used by the current-season API.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKey::FirstPractice => "fp1",
            SessionKey::SecondPractice => "fp2",
            SessionKey::ThirdPractice => "fp3",
            SessionKey::SprintQualifying => "sprintQualy",
            SessionKey::SprintRace => "sprintRace",
            SessionKey::Qualifying => "qualy",
            SessionKey::Race => "race",
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start of a session as published upstream. Either field may be null.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTiming {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// One optional timing per session key.
///
/// A value of the wrong shape (a string, a number, an array) is treated the
/// same as an absent key so that one broken entry cannot poison the race.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekendSchedule {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fp1: Option<SessionTiming>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fp2: Option<SessionTiming>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fp3: Option<SessionTiming>,
    #[serde(
        rename = "sprintQualy",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub sprint_qualifying: Option<SessionTiming>,
    #[serde(
        rename = "sprintRace",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub sprint_race: Option<SessionTiming>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub qualy: Option<SessionTiming>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub race: Option<SessionTiming>,
}

impl WeekendSchedule {
    pub fn get(&self, key: SessionKey) -> Option<&SessionTiming> {
        match key {
            SessionKey::FirstPractice => self.fp1.as_ref(),
            SessionKey::SecondPractice => self.fp2.as_ref(),
            SessionKey::ThirdPractice => self.fp3.as_ref(),
            SessionKey::SprintQualifying => self.sprint_qualifying.as_ref(),
            SessionKey::SprintRace => self.sprint_race.as_ref(),
            SessionKey::Qualifying => self.qualy.as_ref(),
            SessionKey::Race => self.race.as_ref(),
        }
    }

    pub fn set(&mut self, key: SessionKey, timing: SessionTiming) {
        let slot = match key {
            SessionKey::FirstPractice => &mut self.fp1,
            SessionKey::SecondPractice => &mut self.fp2,
            SessionKey::ThirdPractice => &mut self.fp3,
            SessionKey::SprintQualifying => &mut self.sprint_qualifying,
            SessionKey::SprintRace => &mut self.sprint_race,
            SessionKey::Qualifying => &mut self.qualy,
            SessionKey::Race => &mut self.race,
        };
        *slot = Some(timing);
    }

    /// Present sessions in [`SessionKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (SessionKey, &SessionTiming)> + '_ {
        SessionKey::ALL
            .into_iter()
            .filter_map(move |k| self.get(k).map(|t| (k, t)))
    }
}

/// A race weekend from the schedule snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawRace")]
pub struct Race {
    #[serde(rename = "raceName")]
    pub race_name: String,
    pub round: u32,
    /// Read from `schedule` (current-season API) or `sessions` (older
    /// snapshots). When both are present the first one that is a session
    /// map wins, in that order.
    pub schedule: WeekendSchedule,
}

#[derive(Deserialize)]
struct RawRace {
    #[serde(rename = "raceName")]
    race_name: String,
    #[serde(deserialize_with = "round_number")]
    round: u32,
    #[serde(default, deserialize_with = "lenient")]
    schedule: Option<WeekendSchedule>,
    #[serde(default, deserialize_with = "lenient")]
    sessions: Option<WeekendSchedule>,
}

impl From<RawRace> for Race {
    fn from(raw: RawRace) -> Self {
        Self {
            race_name: raw.race_name,
            round: raw.round,
            schedule: raw.schedule.or(raw.sessions).unwrap_or_default(),
        }
    }
}

/// The nearest upcoming session, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedSession {
    #[serde(rename = "raceName")]
    pub race_name: String,
    pub round: u32,
    #[serde(rename = "sessionKey")]
    pub session_key: SessionKey,
    #[serde(rename = "dateTimeUTC", with = "crate::time::iso_millis")]
    pub date_time_utc: DateTime<Utc>,
}

fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = serde_json::Value::deserialize(de)?;
    Ok(serde_json::from_value(v).ok())
}

fn round_number<'de, D>(de: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Round {
        Number(u32),
        Text(String),
    }

    match Round::deserialize(de)? {
        Round::Number(n) => Ok(n),
        Round::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid round: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_session_value_is_dropped_not_fatal() {
        let race: Race = serde_json::from_value(serde_json::json!({
            "raceName": "Bahrain Grand Prix",
            "round": "4",
            "schedule": {
                "fp1": "tbd",
                "race": { "date": "2025-04-13", "time": "15:00:00Z" }
            }
        }))
        .unwrap();

        assert_eq!(race.round, 4);
        assert!(race.schedule.fp1.is_none());
        let keys: Vec<_> = race.schedule.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![SessionKey::Race]);
    }

    #[test]
    fn sessions_alias_is_accepted() {
        let race: Race = serde_json::from_value(serde_json::json!({
            "raceName": "Monaco Grand Prix",
            "round": 8,
            "sessions": { "qualy": { "date": "2025-05-24", "time": null } }
        }))
        .unwrap();

        let qualy = race.schedule.qualy.unwrap();
        assert_eq!(qualy.date.as_deref(), Some("2025-05-24"));
        assert_eq!(qualy.time, None);
    }

    #[test]
    fn null_schedule_falls_back_to_sessions() {
        let race: Race = serde_json::from_value(serde_json::json!({
            "raceName": "Miami Grand Prix",
            "round": 6,
            "schedule": null,
            "sessions": { "race": { "date": "2025-05-04", "time": "20:00:00Z" } }
        }))
        .unwrap();

        assert_eq!(race.schedule.race.unwrap().date.as_deref(), Some("2025-05-04"));
    }

    #[test]
    fn schedule_wins_over_sessions() {
        let race: Race = serde_json::from_value(serde_json::json!({
            "raceName": "Miami Grand Prix",
            "round": 6,
            "schedule": { "qualy": { "date": "2025-05-03", "time": "20:00:00Z" } },
            "sessions": { "race": { "date": "2025-05-04", "time": "20:00:00Z" } }
        }))
        .unwrap();

        assert!(race.schedule.qualy.is_some());
        assert!(race.schedule.race.is_none());
    }

    #[test]
    fn session_key_wire_names() {
        for key in SessionKey::ALL {
            let s = serde_json::to_string(&key).unwrap();
            assert_eq!(s, format!("\"{}\"", key.as_str()));
        }
    }
}
