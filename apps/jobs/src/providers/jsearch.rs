//! JSearch (RapidAPI), first fallback. Requires `RAPIDAPI_KEY`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::models::job::{DEFAULT_JOB_TYPE, DEFAULT_LOCATION, NOT_SPECIFIED, NO_APPLY_URL, UNKNOWN_COMPANY};
use crate::models::{Highlights, JobRecord, Schedule};
use crate::providers::muse::id_string;
use crate::providers::{lenient_list, non_blank, send_json, JobProvider, ProviderError};

pub const JSEARCH_API_URL: &str = "https://jsearch.p.rapidapi.com/search";
const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";
/// Required experience above this many months reads as a senior role.
const SENIOR_EXPERIENCE_MONTHS: f64 = 60.0;

#[derive(Debug, Deserialize)]
pub struct JSearchResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub data: Vec<JSearchJob>,
}

#[derive(Debug, Deserialize)]
pub struct JSearchJob {
    #[serde(default)]
    pub job_id: Value,
    pub job_title: Option<String>,
    pub employer_name: Option<String>,
    pub employer_logo: Option<String>,
    pub job_city: Option<String>,
    pub job_country: Option<String>,
    pub job_description: Option<String>,
    pub job_employment_type: Option<String>,
    #[serde(default)]
    pub job_salary: Value,
    pub job_posted_at_datetime_utc: Option<String>,
    pub job_apply_link: Option<String>,
    pub job_required_experience: Option<RequiredExperience>,
    pub job_highlights: Option<Highlights>,
    pub job_is_remote: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RequiredExperience {
    pub required_experience_in_months: Option<f64>,
}

#[derive(Clone)]
pub struct JSearchProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl JSearchProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, JSEARCH_API_URL)
    }

    pub fn with_base_url(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl JobProvider for JSearchProvider {
    fn name(&self) -> &'static str {
        "JSearch"
    }

    fn is_eligible(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(
        &self,
        query: &str,
        location: Option<&str>,
    ) -> Result<Vec<JobRecord>, ProviderError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let search = match location {
            Some(location) => format!("{query} in {location}"),
            None => query.to_string(),
        };

        let request = self
            .client
            .get(&self.base_url)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", JSEARCH_HOST)
            .query(&[
                ("query", search.as_str()),
                ("page", "1"),
                ("num_pages", "1"),
                ("date_posted", "all"),
            ]);
        let response: JSearchResponse = send_json(self.name(), request).await?;

        Ok(response
            .data
            .into_iter()
            .map(map_job)
            .collect())
    }
}

/// Maps one JSearch posting to a `JobRecord`.
pub fn map_job(job: JSearchJob) -> JobRecord {
    let city = non_blank(job.job_city);
    let country = non_blank(job.job_country);
    let location = match (city, country) {
        (Some(city), Some(country)) => format!("{city}, {country}"),
        (_, Some(country)) => country,
        _ => DEFAULT_LOCATION.to_string(),
    };

    let months = job
        .job_required_experience
        .and_then(|e| e.required_experience_in_months)
        .unwrap_or(0.0);
    let level = if months > SENIOR_EXPERIENCE_MONTHS {
        "Senior"
    } else if months > 0.0 {
        "Mid-level"
    } else {
        "Entry Level"
    };

    let schedule = if job.job_is_remote.unwrap_or(false) {
        Schedule::Remote
    } else {
        Schedule::OnSite
    };

    JobRecord {
        id: id_string(&job.job_id),
        title: job.job_title.unwrap_or_default(),
        company: non_blank(job.employer_name).unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        location,
        description: job.job_description.unwrap_or_default(),
        job_type: employment_type_label(job.job_employment_type.as_deref()),
        salary: salary_label(&job.job_salary),
        date_posted: non_blank(job.job_posted_at_datetime_utc),
        apply_url: non_blank(job.job_apply_link).unwrap_or_else(|| NO_APPLY_URL.to_string()),
        logo: non_blank(job.employer_logo),
        level: level.to_string(),
        schedule: Some(schedule),
        highlights: job.job_highlights.filter(|h| !h.is_empty()),
        category: None,
    }
}

/// JSearch sends upper-case codes like `FULLTIME`.
fn employment_type_label(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_JOB_TYPE.to_string();
    };
    match raw.to_uppercase().as_str() {
        "FULLTIME" | "FULL_TIME" => "Full-time".to_string(),
        "PARTTIME" | "PART_TIME" => "Part-time".to_string(),
        "CONTRACTOR" | "CONTRACT" => "Contract".to_string(),
        "INTERN" | "INTERNSHIP" => "Internship".to_string(),
        _ => raw.to_string(),
    }
}

fn salary_label(raw: &Value) -> String {
    match raw {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> JSearchJob {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_posting_maps_every_field() {
        let job = map_job(parse(json!({
            "job_id": "xyz==",
            "job_title": "Site Reliability Engineer",
            "employer_name": "Globex",
            "employer_logo": "https://cdn.example.com/globex.png",
            "job_city": "Austin",
            "job_country": "US",
            "job_description": "Keep things up.",
            "job_employment_type": "FULLTIME",
            "job_salary": "$150k",
            "job_posted_at_datetime_utc": "2024-03-11T00:00:00.000Z",
            "job_apply_link": "https://globex.example.com/apply",
            "job_required_experience": {"required_experience_in_months": 72},
            "job_highlights": {
                "Qualifications": ["5+ years Linux"],
                "Responsibilities": ["On-call rotation"],
                "Benefits": ["Dental"]
            },
            "job_is_remote": true
        })));

        assert_eq!(job.id, "xyz==");
        assert_eq!(job.location, "Austin, US");
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(job.salary, "$150k");
        assert_eq!(job.level, "Senior");
        assert_eq!(job.schedule, Some(Schedule::Remote));
        let highlights = job.highlights.unwrap();
        assert_eq!(highlights.qualifications, vec!["5+ years Linux"]);
        assert_eq!(highlights.responsibilities, vec!["On-call rotation"]);
    }

    #[test]
    fn test_location_falls_back_to_country_then_remote() {
        let job = map_job(parse(json!({"job_id": "1", "job_country": "DE"})));
        assert_eq!(job.location, "DE");

        let job = map_job(parse(json!({"job_id": "2", "job_city": "Paris"})));
        assert_eq!(job.location, DEFAULT_LOCATION);
    }

    #[test]
    fn test_experience_levels() {
        let level = |months: Value| {
            map_job(parse(json!({
                "job_id": "1",
                "job_required_experience": {"required_experience_in_months": months}
            })))
            .level
        };
        assert_eq!(level(json!(61)), "Senior");
        assert_eq!(level(json!(60)), "Mid-level");
        assert_eq!(level(json!(12)), "Mid-level");
        assert_eq!(level(json!(0)), "Entry Level");
        assert_eq!(level(Value::Null), "Entry Level");
    }

    #[test]
    fn test_sparse_posting_gets_defaults() {
        let job = map_job(parse(json!({"job_id": "1", "job_salary": null, "job_highlights": {}})));
        assert_eq!(job.company, UNKNOWN_COMPANY);
        assert_eq!(job.job_type, DEFAULT_JOB_TYPE);
        assert_eq!(job.salary, NOT_SPECIFIED);
        assert_eq!(job.apply_url, NO_APPLY_URL);
        assert_eq!(job.schedule, Some(Schedule::OnSite));
        assert!(job.highlights.is_none());
    }

    #[test]
    fn test_employment_type_labels() {
        assert_eq!(employment_type_label(Some("PARTTIME")), "Part-time");
        assert_eq!(employment_type_label(Some("CONTRACTOR")), "Contract");
        assert_eq!(employment_type_label(Some("INTERN")), "Internship");
        assert_eq!(employment_type_label(Some("Temporary")), "Temporary");
        assert_eq!(employment_type_label(None), DEFAULT_JOB_TYPE);
    }

    #[test]
    fn test_numeric_salary_is_rendered() {
        assert_eq!(salary_label(&json!(95000)), "95000");
    }

    #[test]
    fn test_missing_key_makes_provider_ineligible() {
        let client = Client::new();
        assert!(!JSearchProvider::new(client.clone(), None).is_eligible());
        assert!(JSearchProvider::new(client, Some("key".to_string())).is_eligible());
    }
}
