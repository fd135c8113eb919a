//! Instants as clients send them: RFC 3339 timestamps, or bare
//! `YYYY-MM-DD` dates from date pickers, read as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{ResmanError, ResmanResult};

pub fn parse_instant(raw: &str) -> ResmanResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ResmanError::validation(format!("invalid date: {raw}")))
}

/// `deserialize_with` helper for required instants.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

/// `deserialize_with` helper for optional instants. Pair it with
/// `#[serde(default)]` so an absent field stays `None`.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_instant(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
