//! The Muse, primary provider. Public API, no credential required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::models::job::{DEFAULT_JOB_TYPE, DEFAULT_LOCATION, NOT_SPECIFIED, NO_APPLY_URL, UNKNOWN_COMPANY};
use crate::models::{JobRecord, Schedule};
use crate::providers::{join_names, lenient_list, non_blank, send_json, JobProvider, ProviderError};

pub const MUSE_API_URL: &str = "https://www.themuse.com/api/public/jobs";
const MUSE_CATEGORY: &str = "Software Engineering";

#[derive(Debug, Deserialize)]
pub struct MuseResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<MuseJob>,
}

#[derive(Debug, Deserialize)]
pub struct MuseJob {
    #[serde(default)]
    pub id: Value,
    pub name: Option<String>,
    pub contents: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub locations: Vec<MuseNamed>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub levels: Vec<MuseNamed>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<MuseNamed>,
    pub company: Option<MuseCompany>,
    pub refs: Option<MuseJobRefs>,
}

#[derive(Debug, Deserialize)]
pub struct MuseNamed {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MuseCompany {
    pub name: Option<String>,
    pub refs: Option<MuseCompanyRefs>,
}

#[derive(Debug, Deserialize)]
pub struct MuseCompanyRefs {
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MuseJobRefs {
    pub landing_page: Option<String>,
}

#[derive(Clone)]
pub struct MuseProvider {
    client: Client,
    base_url: String,
}

impl MuseProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, MUSE_API_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl JobProvider for MuseProvider {
    fn name(&self) -> &'static str {
        "The Muse"
    }

    async fn fetch(
        &self,
        query: &str,
        location: Option<&str>,
    ) -> Result<Vec<JobRecord>, ProviderError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("page", "0"),
            ("descending", "true"),
            ("category", MUSE_CATEGORY),
        ];
        if !query.is_empty() {
            params.push(("search", query));
        }
        if let Some(location) = location {
            params.push(("location", location));
        }

        let request = self.client.get(&self.base_url).query(&params);
        let response: MuseResponse = send_json(self.name(), request).await?;

        Ok(response
            .results
            .into_iter()
            .map(map_job)
            .collect())
    }
}

/// Maps one Muse posting to a `JobRecord`.
pub fn map_job(job: MuseJob) -> JobRecord {
    let location_names: Vec<String> = job
        .locations
        .into_iter()
        .filter_map(|l| l.name)
        .collect();

    let schedule = if location_names
        .iter()
        .any(|name| name.to_lowercase().contains("remote"))
    {
        Schedule::Remote
    } else {
        Schedule::OnSite
    };

    let level = job
        .levels
        .into_iter()
        .filter_map(|l| l.name)
        .collect::<Vec<_>>();

    let categories = job
        .categories
        .into_iter()
        .filter_map(|c| c.name)
        .collect::<Vec<_>>();

    let (company, logo) = match job.company {
        Some(company) => (
            non_blank(company.name),
            company.refs.and_then(|r| non_blank(r.logo)),
        ),
        None => (None, None),
    };

    JobRecord {
        id: id_string(&job.id),
        title: job.name.unwrap_or_default(),
        company: company.unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        location: join_names(location_names.iter().map(String::as_str))
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        description: job.contents.unwrap_or_default(),
        job_type: non_blank(job.job_type).unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string()),
        salary: NOT_SPECIFIED.to_string(),
        date_posted: non_blank(job.publication_date),
        apply_url: job
            .refs
            .and_then(|r| non_blank(r.landing_page))
            .unwrap_or_else(|| NO_APPLY_URL.to_string()),
        logo,
        level: join_names(level.iter().map(String::as_str))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        schedule: Some(schedule),
        highlights: None,
        category: join_names(categories.iter().map(String::as_str)),
    }
}

/// Provider ids arrive as numbers or strings.
pub(crate) fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
