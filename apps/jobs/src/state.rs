//! Board state: the single container a view layer renders from.
//!
//! `reduce` is a pure `(state, event) -> state'` transition and
//! `derive_visible_jobs` is a pure projection, so the whole search/filter
//! pipeline is testable without any UI. `JobBoard` drives both around the
//! async fetcher.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{AppError, UnavailableReason};
use crate::fetcher::JobFetcher;
use crate::filter::{apply_filters_at, FilterChange, FilterState, SearchState};
use crate::models::JobRecord;

/// Everything the view needs to render the job list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    /// The most recent successful fetch. Replaced wholesale, never merged.
    pub jobs: Vec<JobRecord>,
    pub search: SearchState,
    pub filters: FilterState,
    pub loading: bool,
    pub error: Option<UnavailableReason>,
    /// Id of the newest search issued. Responses for older ids are dropped.
    pub latest_request: u64,
}

#[derive(Debug, Clone)]
pub enum BoardEvent {
    SearchSubmitted {
        query: String,
        location: String,
    },
    FetchSucceeded {
        request: u64,
        jobs: Vec<JobRecord>,
    },
    FetchFailed {
        request: u64,
        reason: UnavailableReason,
    },
    FilterChanged(FilterChange),
}

/// Applies one event to the state.
pub fn reduce(state: BoardState, event: BoardEvent) -> BoardState {
    match event {
        BoardEvent::SearchSubmitted { query, location } => BoardState {
            search: SearchState {
                search_query: query,
                location_query: location,
            },
            loading: true,
            error: None,
            latest_request: state.latest_request + 1,
            ..state
        },
        BoardEvent::FetchSucceeded { request, .. } | BoardEvent::FetchFailed { request, .. }
            if request != state.latest_request =>
        {
            debug!(
                "Discarding stale response for request {request} (latest is {})",
                state.latest_request
            );
            state
        }
        BoardEvent::FetchSucceeded { jobs, .. } => {
            let error = jobs.is_empty().then_some(UnavailableReason::NoMatches);
            BoardState {
                jobs,
                loading: false,
                error,
                ..state
            }
        }
        BoardEvent::FetchFailed { reason, .. } => BoardState {
            jobs: Vec::new(),
            loading: false,
            error: Some(reason),
            ..state
        },
        BoardEvent::FilterChanged(change) => BoardState {
            filters: state.filters.with(change),
            ..state
        },
    }
}

/// The jobs currently visible under the state's search and filters.
pub fn derive_visible_jobs(state: &BoardState) -> Vec<&JobRecord> {
    derive_visible_jobs_at(state, Utc::now())
}

pub fn derive_visible_jobs_at(state: &BoardState, now: DateTime<Utc>) -> Vec<&JobRecord> {
    apply_filters_at(&state.jobs, &state.search, &state.filters, now)
}

// ────────────────────────────────────────────────────────────────────────────
// Async driver
// ────────────────────────────────────────────────────────────────────────────

/// Owns the fetcher and the board state. The lock is never held across a
/// network call, so overlapping searches resolve independently and only
/// the newest one lands.
pub struct JobBoard {
    fetcher: JobFetcher,
    default_query: String,
    state: Mutex<BoardState>,
}

impl JobBoard {
    pub fn new(fetcher: JobFetcher, default_query: impl Into<String>) -> Self {
        Self {
            fetcher,
            default_query: default_query.into(),
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(JobFetcher::from_config(config), config.default_query.clone())
    }

    /// Initial load: default query, no search text applied as a filter.
    pub async fn load_initial(&self) -> BoardState {
        self.search("", "").await
    }

    /// Submits a search and waits for its result. Empty query text fetches
    /// the default query but filters nothing.
    pub async fn search(&self, query: &str, location: &str) -> BoardState {
        let request = {
            let mut state = self.state.lock().await;
            let next = reduce(
                std::mem::take(&mut *state),
                BoardEvent::SearchSubmitted {
                    query: query.to_string(),
                    location: location.to_string(),
                },
            );
            *state = next;
            state.latest_request
        };

        let fetch_query = match query.trim() {
            "" => self.default_query.as_str(),
            q => q,
        };
        let event = match self.fetcher.fetch(fetch_query, Some(location)).await {
            Ok(jobs) => {
                info!("Loaded {} jobs for request {request}", jobs.len());
                BoardEvent::FetchSucceeded { request, jobs }
            }
            Err(AppError::JobsUnavailable(reason)) => BoardEvent::FetchFailed { request, reason },
            Err(e) => {
                tracing::error!("Job fetch failed unexpectedly: {e}");
                BoardEvent::FetchFailed {
                    request,
                    reason: UnavailableReason::Unreachable,
                }
            }
        };

        self.apply(event).await
    }

    /// Updates one filter from its wire `(field, value)` pair.
    pub async fn set_filter(&self, field: &str, value: &str) -> Result<BoardState, AppError> {
        let change = FilterChange::parse(field, value)?;
        Ok(self.apply(BoardEvent::FilterChanged(change)).await)
    }

    pub async fn snapshot(&self) -> BoardState {
        self.state.lock().await.clone()
    }

    /// Owned copy of the currently visible jobs.
    pub async fn visible_jobs(&self) -> Vec<JobRecord> {
        let state = self.state.lock().await;
        derive_visible_jobs(&state).into_iter().cloned().collect()
    }

    async fn apply(&self, event: BoardEvent) -> BoardState {
        let mut state = self.state.lock().await;
        *state = reduce(std::mem::take(&mut *state), event);
        state.clone()
    }
}
