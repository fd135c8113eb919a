//! HTTP handlers. Each one authenticates through [`AuthUser`], hands the
//! request to the resource service and wraps the result in the
//! `{success, message?, ...}` envelope.
//!
//! [`AuthUser`]: crate::extract::AuthUser

pub mod assignments;
pub mod auth;
pub mod dashboard;
pub mod projects;
pub mod users;

use axum::Json;
use resman_core::capacity::DateRange;
use resman_core::error::{ResmanError, ResmanResult};
use resman_core::models::dates::parse_instant;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiResult;

pub async fn ping() -> &'static str {
    "pong"
}

/// Builds a success envelope. Object payloads are merged into the
/// envelope; anything else lands under `data`.
pub(crate) fn envelope<T: Serialize>(message: Option<&str>, payload: T) -> ApiResult<Json<Value>> {
    let value =
        serde_json::to_value(payload).map_err(|e| ResmanError::Internal(e.to_string()))?;
    let mut body = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => Map::from_iter([("data".to_string(), other)]),
    };
    body.insert("success".into(), Value::Bool(true));
    if let Some(message) = message {
        body.insert("message".into(), Value::String(message.into()));
    }
    Ok(Json(Value::Object(body)))
}

/// `?startDate&endDate` query bounds.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeQuery {
    pub fn range(&self) -> ResmanResult<Option<DateRange>> {
        let start = self.start_date.as_deref().map(parse_instant).transpose()?;
        let end = self.end_date.as_deref().map(parse_instant).transpose()?;
        DateRange::from_bounds(start, end)
    }
}

/// Splits a comma-separated query value, dropping empty items.
pub(crate) fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_merges_object_payloads() {
        let Json(body) = envelope(Some("Done"), json!({"project": {"id": 1}})).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Done");
        assert_eq!(body["project"]["id"], 1);

        let Json(body) = envelope(None, vec![1, 2]).unwrap();
        assert_eq!(body["data"], json!([1, 2]));
        assert!(body.get("message").is_none());
    }

    #[test]
    fn range_accepts_dates_and_timestamps() {
        let query = RangeQuery {
            start_date: Some("2025-03-01".into()),
            end_date: Some("2025-05-01T12:00:00Z".into()),
        };
        let range = query.range().unwrap().unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn range_needs_both_bounds() {
        let query = RangeQuery {
            start_date: Some("2025-03-01".into()),
            end_date: None,
        };
        assert!(query.range().unwrap().is_none());
    }

    #[test]
    fn malformed_or_reversed_range_is_rejected() {
        let garbage = RangeQuery {
            start_date: Some("yesterday".into()),
            end_date: Some("2025-05-01".into()),
        };
        assert!(matches!(garbage.range(), Err(ResmanError::Validation { .. })));

        let reversed = RangeQuery {
            start_date: Some("2025-05-01".into()),
            end_date: Some("2025-03-01".into()),
        };
        assert!(reversed.range().is_err());
    }

    #[test]
    fn csv_splitting() {
        assert_eq!(split_csv(Some("rust, go,,")), vec!["rust", "go"]);
        assert!(split_csv(None).is_empty());
    }
}
