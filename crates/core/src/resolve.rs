use chrono::{DateTime, Utc};

use crate::model::{Race, ResolvedSession, SessionKey};
use crate::snapshot::{SnapshotError, SnapshotSource};
use crate::time::combine_date_time;

/// Loads the snapshot from `source` and resolves the next session after `now`.
///
/// `Ok(None)` means the snapshot was readable but nothing is scheduled after
/// `now`; only an unreadable or malformed snapshot is an error.
pub fn resolve_next_session(
    source: &dyn SnapshotSource,
    now: DateTime<Utc>,
) -> Result<Option<ResolvedSession>, SnapshotError> {
    let races = source.load()?;
    Ok(next_session(&races, now))
}

/// Returns the earliest session across `races` that starts strictly after `now`.
///
/// Sessions missing a date or a time, or whose date and time do not combine
/// into a valid instant, are skipped. When two sessions start at the same
/// instant the one met first wins: races in slice order, sessions in
/// [`SessionKey::ALL`] order.
pub fn next_session(races: &[Race], now: DateTime<Utc>) -> Option<ResolvedSession> {
    let mut best: Option<(DateTime<Utc>, &Race, SessionKey)> = None;

    for race in races {
        for (key, timing) in race.schedule.iter() {
            let (Some(date), Some(time)) = (timing.date.as_deref(), timing.time.as_deref()) else {
                continue;
            };
            let Some(at) = combine_date_time(date, time) else {
                tracing::warn!(
                    race = %race.race_name,
                    session = %key,
                    date,
                    time,
                    "unparseable session start, skipping"
                );
                continue;
            };
            if at <= now {
                continue;
            }
            // strict `<` keeps the first of equal instants
            if best.as_ref().map_or(true, |(b, _, _)| at < *b) {
                best = Some((at, race, key));
            }
        }
    }

    best.map(|(at, race, key)| ResolvedSession {
        race_name: race.race_name.clone(),
        round: race.round,
        session_key: key,
        date_time_utc: at,
    })
}
