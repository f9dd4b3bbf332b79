use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;

use super::{ApiError, ApiResult, TripApi};
use crate::models::catalog::{BacklogCard, BacklogCardPatch};
use crate::models::schedule::{ScheduleEntry, ScheduleEntryPayload};
use crate::models::settings::{AppConfig, Session};
use crate::models::trip::{Trip, TripLeg};

/// Blocking JSON client for the trip backend.
///
/// Cheap to clone; background jobs take their own copy.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl RestClient {
    pub fn new(config: &AppConfig, session: &Session) -> ApiResult<Self> {
        let base_url = normalize_base_url(&config.api_base)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with bounded retries on transient failures.
    fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        let mut attempt = 0;
        loop {
            match self.send_json(self.client.get(&url), &url) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    log::warn!("GET {} attempt {} failed: {}", url, attempt, err);
                    thread::sleep(Duration::from_millis(self.retry_delay_ms));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> ApiResult<T> {
        let response = check_status(request.send()?, url)?;
        response.json().map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

fn check_status(response: Response, url: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

impl TripApi for RestClient {
    fn list_backlog_cards(&self) -> ApiResult<Vec<BacklogCard>> {
        self.get_json("/backlog/cards")
    }

    fn update_backlog_card(&self, card_id: i64, patch: &BacklogCardPatch) -> ApiResult<BacklogCard> {
        let url = self.url(&format!("/backlog/cards/{}", card_id));
        self.send_json(self.client.patch(&url).json(patch), &url)
    }

    fn list_trips(&self) -> ApiResult<Vec<Trip>> {
        self.get_json("/trips/")
    }

    fn list_trip_legs(&self, trip_id: i64) -> ApiResult<Vec<TripLeg>> {
        self.get_json(&format!("/trips/{}/legs", trip_id))
    }

    fn get_schedule(&self, trip_id: i64) -> ApiResult<Vec<ScheduleEntry>> {
        self.get_json(&format!("/trips/{}/schedule", trip_id))
    }

    fn replace_schedule(
        &self,
        trip_id: i64,
        entries: &[ScheduleEntryPayload],
    ) -> ApiResult<Vec<ScheduleEntry>> {
        let url = self.url(&format!("/trips/{}/schedule", trip_id));
        self.send_json(self.client.post(&url).json(entries), &url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8000/").unwrap(),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            normalize_base_url(" https://api.example.com/v1// ").unwrap(),
            "https://api.example.com/v1"
        );
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("https://").is_err());
    }

    #[test]
    fn test_client_builds_urls_from_config() {
        let config = AppConfig {
            api_base: "http://localhost:8000/".into(),
            ..AppConfig::default()
        };
        let client = RestClient::new(&config, &Session::new(Some("abc".into()))).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/trips/3/schedule"), "http://localhost:8000/trips/3/schedule");
    }

    #[test]
    fn test_rejects_unusable_token() {
        let config = AppConfig::default();
        let session = Session::new(Some("bad\ntoken".into()));
        assert!(RestClient::new(&config, &session).is_err());
    }
}
