//! Filter Engine: pure predicates over the fetched job list.
//!
//! Every predicate is a no-op on its "all"/empty value, they are ANDed, and
//! surviving records keep their input order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::parse_posted_date;
use crate::models::JobRecord;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ────────────────────────────────────────────────────────────────────────────
// Filter values
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobTypeFilter {
    #[default]
    All,
    FullTime,
    PartTime,
    Contract,
    Remote,
}

impl JobTypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobTypeFilter::All => "all",
            JobTypeFilter::FullTime => "full-time",
            JobTypeFilter::PartTime => "part-time",
            JobTypeFilter::Contract => "contract",
            JobTypeFilter::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevelFilter {
    #[default]
    All,
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevelFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevelFilter::All => "all",
            ExperienceLevelFilter::Entry => "entry",
            ExperienceLevelFilter::Mid => "mid",
            ExperienceLevelFilter::Senior => "senior",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePostedFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
}

impl DatePostedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePostedFilter::All => "all",
            DatePostedFilter::Last24Hours => "24h",
            DatePostedFilter::Last7Days => "7d",
            DatePostedFilter::Last30Days => "30d",
        }
    }

    /// Maximum posting age in days, or `None` for no limit.
    pub fn max_age_days(&self) -> Option<f64> {
        match self {
            DatePostedFilter::All => None,
            DatePostedFilter::Last24Hours => Some(1.0),
            DatePostedFilter::Last7Days => Some(7.0),
            DatePostedFilter::Last30Days => Some(30.0),
        }
    }
}

macro_rules! wire_value {
    ($ty:ty, $label:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = value.trim().to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        AppError::Validation(format!("Unknown {} filter value '{}'", $label, value))
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_value!(JobTypeFilter, "jobType", [
    JobTypeFilter::All,
    JobTypeFilter::FullTime,
    JobTypeFilter::PartTime,
    JobTypeFilter::Contract,
    JobTypeFilter::Remote,
]);

wire_value!(ExperienceLevelFilter, "experienceLevel", [
    ExperienceLevelFilter::All,
    ExperienceLevelFilter::Entry,
    ExperienceLevelFilter::Mid,
    ExperienceLevelFilter::Senior,
]);

wire_value!(DatePostedFilter, "datePosted", [
    DatePostedFilter::All,
    DatePostedFilter::Last24Hours,
    DatePostedFilter::Last7Days,
    DatePostedFilter::Last30Days,
]);

/// The three radio-button filters. Starts as all `All`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub job_type: JobTypeFilter,
    pub experience_level: ExperienceLevelFilter,
    pub date_posted: DatePostedFilter,
}

/// A single-field filter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    JobType(JobTypeFilter),
    ExperienceLevel(ExperienceLevelFilter),
    DatePosted(DatePostedFilter),
}

impl FilterChange {
    /// Parses a `(field, value)` pair as sent by the filters panel.
    pub fn parse(field: &str, value: &str) -> Result<Self, AppError> {
        match field {
            "jobType" => Ok(FilterChange::JobType(value.parse()?)),
            "experienceLevel" => Ok(FilterChange::ExperienceLevel(value.parse()?)),
            "datePosted" => Ok(FilterChange::DatePosted(value.parse()?)),
            other => Err(AppError::Validation(format!("Unknown filter field '{other}'"))),
        }
    }
}

impl FilterState {
    pub fn with(mut self, change: FilterChange) -> Self {
        match change {
            FilterChange::JobType(v) => self.job_type = v,
            FilterChange::ExperienceLevel(v) => self.experience_level = v,
            FilterChange::DatePosted(v) => self.date_posted = v,
        }
        self
    }
}

/// Free-text search inputs, kept separately from the filters panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub search_query: String,
    pub location_query: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Predicates
// ────────────────────────────────────────────────────────────────────────────

/// Applies search and filters relative to the current time.
pub fn apply_filters<'a>(
    jobs: &'a [JobRecord],
    search: &SearchState,
    filters: &FilterState,
) -> Vec<&'a JobRecord> {
    apply_filters_at(jobs, search, filters, Utc::now())
}

/// Applies search and filters with an explicit reference time.
pub fn apply_filters_at<'a>(
    jobs: &'a [JobRecord],
    search: &SearchState,
    filters: &FilterState,
    now: DateTime<Utc>,
) -> Vec<&'a JobRecord> {
    let keyword = search.search_query.trim().to_lowercase();
    let location = search.location_query.trim().to_lowercase();

    jobs.iter()
        .filter(|job| matches_keyword(job, &keyword))
        .filter(|job| matches_location(job, &location))
        .filter(|job| matches_job_type(job, filters.job_type))
        .filter(|job| matches_level(job, filters.experience_level))
        .filter(|job| matches_date_posted(job, filters.date_posted, now))
        .collect()
}

fn matches_keyword(job: &JobRecord, keyword: &str) -> bool {
    keyword.is_empty()
        || job.title.to_lowercase().contains(keyword)
        || job.company.to_lowercase().contains(keyword)
        || job.description.to_lowercase().contains(keyword)
}

fn matches_location(job: &JobRecord, location: &str) -> bool {
    location.is_empty() || job.location.to_lowercase().contains(location)
}

fn matches_job_type(job: &JobRecord, filter: JobTypeFilter) -> bool {
    if filter == JobTypeFilter::All {
        return true;
    }
    let wanted = filter.as_str();
    job.job_type.eq_ignore_ascii_case(wanted)
        || job
            .schedule
            .is_some_and(|s| s.label().eq_ignore_ascii_case(wanted))
}

fn matches_level(job: &JobRecord, filter: ExperienceLevelFilter) -> bool {
    filter == ExperienceLevelFilter::All || job.level.to_lowercase().contains(filter.as_str())
}

/// Undated postings always pass. A date that is present but unreadable
/// fails every window except `All`.
fn matches_date_posted(job: &JobRecord, filter: DatePostedFilter, now: DateTime<Utc>) -> bool {
    let (Some(max_days), Some(raw)) = (filter.max_age_days(), job.date_posted.as_deref()) else {
        return true;
    };
    match parse_posted_date(raw) {
        Some(posted) => {
            let age_days = (now - posted).num_seconds() as f64 / SECONDS_PER_DAY;
            age_days <= max_days
        }
        None => false,
    }
}
