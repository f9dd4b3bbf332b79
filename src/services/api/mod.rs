//! REST collaborator access.
//!
//! [`TripApi`] is the seam every board component talks through; the
//! production implementation is [`client::RestClient`].

pub mod client;

use thiserror::Error;

use crate::models::catalog::{BacklogCard, BacklogCardPatch};
use crate::models::schedule::{ScheduleEntry, ScheduleEntryPayload};
use crate::models::trip::{Trip, TripLeg};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed with HTTP status {status}")]
    Http { status: u16, url: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("session token cannot be sent as a header")]
    InvalidToken,

    #[error("trip {0} not found")]
    TripNotFound(i64),
}

impl ApiError {
    /// Whether retrying the same read could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http { status, .. } => *status >= 500 || *status == 429,
            ApiError::Transport(_) => true,
            ApiError::Decode { .. }
            | ApiError::InvalidBaseUrl(_)
            | ApiError::InvalidToken
            | ApiError::TripNotFound(_) => false,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Endpoints of the trip backend used by the schedule board.
#[cfg_attr(test, mockall::automock)]
pub trait TripApi {
    /// `GET /backlog/cards`
    fn list_backlog_cards(&self) -> ApiResult<Vec<BacklogCard>>;

    /// `PATCH /backlog/cards/{id}`
    fn update_backlog_card(&self, card_id: i64, patch: &BacklogCardPatch) -> ApiResult<BacklogCard>;

    /// `GET /trips`
    fn list_trips(&self) -> ApiResult<Vec<Trip>>;

    /// `GET /trips/{id}/legs`
    fn list_trip_legs(&self, trip_id: i64) -> ApiResult<Vec<TripLeg>>;

    /// `GET /trips/{id}/schedule`
    fn get_schedule(&self, trip_id: i64) -> ApiResult<Vec<ScheduleEntry>>;

    /// `POST /trips/{id}/schedule`: replace semantics.
    fn replace_schedule(
        &self,
        trip_id: i64,
        entries: &[ScheduleEntryPayload],
    ) -> ApiResult<Vec<ScheduleEntry>>;
}

/// Look a trip up in the trip list; the backend has no single-trip read.
pub fn get_trip<A: TripApi + ?Sized>(api: &A, trip_id: i64) -> ApiResult<Trip> {
    api.list_trips()?
        .into_iter()
        .find(|trip| trip.id == trip_id)
        .ok_or(ApiError::TripNotFound(trip_id))
}
