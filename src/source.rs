use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::Event;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no schedule source configured")]
    Unconfigured,
    #[error("request failed for {url}: {reason}")]
    Http { url: String, reason: String },
    #[error("unable to read {path}: {reason}")]
    File { path: String, reason: String },
    #[error("schedule payload is not a category map")]
    InvalidPayload,
}

/// A provider of raw event records grouped by sport category.
pub trait ScheduleSource {
    fn fetch(&self) -> Result<Vec<Event>, SourceError>;
}

/// The production source: a JSON document of `{category: [event, ...]}`
/// fetched over HTTP, or read from disk when the configured location is
/// an existing local path.
pub struct JsonScheduleSource {
    location: String,
}

impl JsonScheduleSource {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl ScheduleSource for JsonScheduleSource {
    fn fetch(&self) -> Result<Vec<Event>, SourceError> {
        if self.location.trim().is_empty() {
            return Err(SourceError::Unconfigured);
        }
        let body = if Path::new(&self.location).exists() {
            std::fs::read_to_string(&self.location).map_err(|err| SourceError::File {
                path: self.location.clone(),
                reason: err.to_string(),
            })?
        } else {
            fetch_body(&self.location)?
        };
        parse_schedule(&body)
    }
}

fn fetch_body(url: &str) -> Result<String, SourceError> {
    static CLIENT: Lazy<Client> = Lazy::new(|| {
        Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("Matchday/0.1")
            .build()
            .expect("http client")
    });

    let http_err = |reason: String| SourceError::Http {
        url: url.to_string(),
        reason,
    };
    let response = CLIENT.get(url).send().map_err(|err| http_err(err.to_string()))?;
    let response = response
        .error_for_status()
        .map_err(|err| http_err(err.to_string()))?;
    response.text().map_err(|err| http_err(err.to_string()))
}

/// Parses a category-grouped schedule document. A category whose value
/// is not an array, or a record that cannot be decoded even with field
/// defaults, is skipped with a warning; neither aborts the batch. The
/// group key always wins over any category stamped on the record.
pub fn parse_schedule(body: &str) -> Result<Vec<Event>, SourceError> {
    let document: Value =
        serde_json::from_str(body).map_err(|_| SourceError::InvalidPayload)?;
    let categories = document.as_object().ok_or(SourceError::InvalidPayload)?;

    let mut events = Vec::new();
    for (category, value) in categories {
        let records = match value.as_array() {
            Some(records) => records,
            None => {
                warn!("category {category:?} is not an array, skipping");
                continue;
            }
        };
        for record in records {
            match serde_json::from_value::<Event>(record.clone()) {
                Ok(mut event) => {
                    event.category = category.clone();
                    events.push(event);
                }
                Err(err) => warn!("skipping malformed record in {category:?}: {err}"),
            }
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_events_and_stamps_category() {
        let body = r#"{
            "Soccer": [
                {"homeTeam": "FC Barcelona", "awayTeam": "Real Madrid",
                 "start": "2026-02-01 20:00", "status": "live",
                 "channels": [{"channel_name": "Sports One", "url": "http://x/1", "channel_code": "es"}]},
                {"homeTeam": "Girona", "awayTeam": "Sevilla", "start": "2026-02-01 18:00"}
            ],
            "NBA": [
                {"homeTeam": "Lakers", "awayTeam": "Celtics", "start": "2026-02-01 21:00"}
            ]
        }"#;
        let events = parse_schedule(body).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| !e.category.is_empty()));
        let clasico = &events[0];
        assert_eq!(clasico.category, "Soccer");
        assert_eq!(clasico.channels[0].region, "es");
    }

    #[test]
    fn tolerates_malformed_categories_and_records() {
        let body = r#"{
            "Soccer": "service temporarily unavailable",
            "Tennis": [
                {"homeTeam": "Alcaraz", "awayTeam": "Sinner", "start": "2026-02-01 15:00"},
                {"channels": 42}
            ]
        }"#;
        let events = parse_schedule(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, "Tennis");
    }

    #[test]
    fn empty_object_yields_zero_events() {
        assert!(parse_schedule("{}").unwrap().is_empty());
    }

    #[test]
    fn non_object_payload_is_an_error() {
        assert!(matches!(
            parse_schedule("[1, 2, 3]"),
            Err(SourceError::InvalidPayload)
        ));
        assert!(matches!(
            parse_schedule("not json"),
            Err(SourceError::InvalidPayload)
        ));
    }

    #[test]
    fn record_defaults_fill_per_field_gaps() {
        let body = r#"{"Boxing": [{"start": "2026-02-01 22:00", "channels": [{}]}]}"#;
        let events = parse_schedule(body).unwrap();
        assert_eq!(events[0].home_team, "TBD");
        assert_eq!(events[0].channels[0].link, "#");
    }
}
