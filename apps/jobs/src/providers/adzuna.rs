//! Adzuna, second fallback. Requires both `ADZUNA_APP_ID` and `ADZUNA_APP_KEY`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::models::job::{DEFAULT_JOB_TYPE, DEFAULT_LOCATION, NOT_SPECIFIED, NO_APPLY_URL, UNKNOWN_COMPANY};
use crate::models::JobRecord;
use crate::providers::muse::id_string;
use crate::providers::{lenient_list, non_blank, send_json, JobProvider, ProviderError};

pub const ADZUNA_API_URL: &str = "https://api.adzuna.com/v1/api/jobs";
const RESULTS_PER_PAGE: &str = "20";

#[derive(Debug, Deserialize)]
pub struct AdzunaResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<AdzunaJob>,
}

#[derive(Debug, Deserialize)]
pub struct AdzunaJob {
    #[serde(default)]
    pub id: Value,
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<AdzunaLabel>,
    pub location: Option<AdzunaLabel>,
    pub category: Option<AdzunaLabel>,
    pub contract_time: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub created: Option<String>,
    pub redirect_url: Option<String>,
}

/// Adzuna wraps most names in an object with `display_name` and/or `label`.
#[derive(Debug, Deserialize)]
pub struct AdzunaLabel {
    pub display_name: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

#[derive(Clone)]
pub struct AdzunaProvider {
    client: Client,
    base_url: String,
    country: String,
    credentials: Option<AdzunaCredentials>,
}

impl AdzunaProvider {
    pub fn new(client: Client, credentials: Option<AdzunaCredentials>, country: &str) -> Self {
        Self::with_base_url(client, credentials, country, ADZUNA_API_URL)
    }

    pub fn with_base_url(
        client: Client,
        credentials: Option<AdzunaCredentials>,
        country: &str,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            country: country.to_lowercase(),
            credentials,
        }
    }

    /// Both halves of the credential must be present.
    pub fn credentials_from(
        app_id: Option<String>,
        app_key: Option<String>,
    ) -> Option<AdzunaCredentials> {
        Some(AdzunaCredentials {
            app_id: app_id?,
            app_key: app_key?,
        })
    }
}

#[async_trait]
impl JobProvider for AdzunaProvider {
    fn name(&self) -> &'static str {
        "Adzuna"
    }

    fn is_eligible(&self) -> bool {
        self.credentials.is_some()
    }

    async fn fetch(
        &self,
        query: &str,
        location: Option<&str>,
    ) -> Result<Vec<JobRecord>, ProviderError> {
        let (app_id, app_key) = match &self.credentials {
            Some(c) => (c.app_id.as_str(), c.app_key.as_str()),
            None => ("", ""),
        };
        let url = format!(
            "{}/{}/search/1",
            self.base_url.trim_end_matches('/'),
            self.country
        );

        let request = self.client.get(url).query(&[
            ("app_id", app_id),
            ("app_key", app_key),
            ("results_per_page", RESULTS_PER_PAGE),
            ("what", query),
            ("where", location.unwrap_or_default()),
            ("content-type", "application/json"),
        ]);
        let response: AdzunaResponse = send_json(self.name(), request).await?;

        Ok(response
            .results
            .into_iter()
            .map(map_job)
            .collect())
    }
}

/// Maps one Adzuna posting to a `JobRecord`.
pub fn map_job(job: AdzunaJob) -> JobRecord {
    let display = |label: Option<AdzunaLabel>| label.and_then(|l| non_blank(l.display_name));

    JobRecord {
        id: id_string(&job.id),
        title: job.title.unwrap_or_default(),
        company: display(job.company).unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        location: display(job.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        description: job.description.unwrap_or_default(),
        job_type: contract_time_label(job.contract_time.as_deref()),
        salary: salary_range_label(job.salary_min, job.salary_max),
        date_posted: non_blank(job.created),
        apply_url: non_blank(job.redirect_url).unwrap_or_else(|| NO_APPLY_URL.to_string()),
        logo: None,
        level: NOT_SPECIFIED.to_string(),
        schedule: None,
        highlights: None,
        category: job.category.and_then(|c| non_blank(c.label)),
    }
}

fn contract_time_label(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some("full_time") => "Full-time".to_string(),
        Some("part_time") => "Part-time".to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => DEFAULT_JOB_TYPE.to_string(),
    }
}

/// Formats `$<min>k - $<max>k`; partial ranges are not shown.
fn salary_range_label(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min > 0.0 && max > 0.0 => format!(
            "${}k - ${}k",
            (min / 1000.0).round() as i64,
            (max / 1000.0).round() as i64
        ),
        _ => NOT_SPECIFIED.to_string(),
    }
}
