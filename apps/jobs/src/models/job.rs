use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_JOB_TYPE: &str = "Full-time";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const UNKNOWN_COMPANY: &str = "Unknown company";
/// Sentinel apply URL meaning "no direct link, fall back to a search".
pub const NO_APPLY_URL: &str = "#";

const JOB_SEARCH_URL: &str = "https://www.google.com/search";
const MAX_HIGHLIGHTS_SHOWN: usize = 3;

/// Work arrangement reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    Remote,
    #[serde(rename = "On-site")]
    OnSite,
    Hybrid,
}

impl Schedule {
    pub fn label(&self) -> &'static str {
        match self {
            Schedule::Remote => "Remote",
            Schedule::OnSite => "On-site",
            Schedule::Hybrid => "Hybrid",
        }
    }
}

/// Structured bullet lists some providers attach to a posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Highlights {
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

impl Highlights {
    pub fn is_empty(&self) -> bool {
        self.qualifications.is_empty() && self.responsibilities.is_empty()
    }

    /// The first few qualifications, as shown on an expanded card.
    pub fn top_qualifications(&self) -> &[String] {
        &self.qualifications[..self.qualifications.len().min(MAX_HIGHLIGHTS_SHOWN)]
    }

    pub fn top_responsibilities(&self) -> &[String] {
        &self.responsibilities[..self.responsibilities.len().min(MAX_HIGHLIGHTS_SHOWN)]
    }
}

/// A provider-agnostic job posting. Built once per fetch and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Raw provider text or HTML. Sanitized lazily by `description::prepare`.
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
    pub date_posted: Option<String>,
    pub apply_url: String,
    pub logo: Option<String>,
    pub level: String,
    pub schedule: Option<Schedule>,
    pub highlights: Option<Highlights>,
    pub category: Option<String>,
}

impl JobRecord {
    /// Where the "Apply" action should go. Records without a direct link
    /// get a job search for the title and company instead.
    pub fn apply_target(&self) -> String {
        let url = self.apply_url.trim();
        if !url.is_empty() && url != NO_APPLY_URL {
            return url.to_string();
        }

        let query = format!("{} {} careers", self.title, self.company);
        Url::parse_with_params(JOB_SEARCH_URL, &[("q", query.as_str()), ("ibp", "htl;jobs")])
            .map(|u| u.to_string())
            .unwrap_or_else(|_| JOB_SEARCH_URL.to_string())
    }

    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.date_posted.as_deref().and_then(parse_posted_date)
    }

    /// Human-friendly age of the posting relative to `now`.
    pub fn posted_label(&self, now: DateTime<Utc>) -> String {
        let Some(posted) = self.posted_at() else {
            return "Recently posted".to_string();
        };

        let days = (now - posted).num_days().abs();
        match days {
            0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            d if d < 7 => format!("{d} days ago"),
            d if d < 30 => format!("{} weeks ago", d / 7),
            d => format!("{} months ago", d / 30),
        }
    }
}

/// Parses the timestamp shapes providers send: RFC 3339, naive date-times
/// (read as UTC) and bare dates.
pub fn parse_posted_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(apply_url: &str, date_posted: Option<&str>) -> JobRecord {
        JobRecord {
            id: "1".to_string(),
            title: "DevOps Engineer".to_string(),
            company: "Acme".to_string(),
            location: DEFAULT_LOCATION.to_string(),
            description: String::new(),
            job_type: DEFAULT_JOB_TYPE.to_string(),
            salary: NOT_SPECIFIED.to_string(),
            date_posted: date_posted.map(str::to_string),
            apply_url: apply_url.to_string(),
            logo: None,
            level: NOT_SPECIFIED.to_string(),
            schedule: None,
            highlights: None,
            category: None,
        }
    }

    #[test]
    fn test_apply_target_uses_direct_link() {
        let job = record("https://jobs.example.com/42", None);
        assert_eq!(job.apply_target(), "https://jobs.example.com/42");
    }

    #[test]
    fn test_apply_target_falls_back_to_search() {
        let job = record(NO_APPLY_URL, None);
        let target = job.apply_target();
        assert!(target.starts_with("https://www.google.com/search?q=DevOps+Engineer+Acme+careers"));
        assert!(target.contains("ibp=htl%3Bjobs"));
    }

    #[test]
    fn test_parse_posted_date_accepts_provider_shapes() {
        assert!(parse_posted_date("2024-03-11T23:59:12.449734Z").is_some());
        assert!(parse_posted_date("2024-03-11T10:00:00").is_some());
        assert!(parse_posted_date("2024-03-11T10:00:00.000").is_some());
        assert!(parse_posted_date("2024-03-11").is_some());
        assert!(parse_posted_date("last tuesday").is_none());
        assert!(parse_posted_date("").is_none());
    }

    #[test]
    fn test_posted_label_buckets() {
        let now = Utc::now();
        let at = |d: DateTime<Utc>| record(NO_APPLY_URL, Some(&d.to_rfc3339()));

        assert_eq!(record(NO_APPLY_URL, None).posted_label(now), "Recently posted");
        assert_eq!(at(now).posted_label(now), "Today");
        assert_eq!(at(now - Duration::days(1)).posted_label(now), "Yesterday");
        assert_eq!(at(now - Duration::days(3)).posted_label(now), "3 days ago");
        assert_eq!(at(now - Duration::days(15)).posted_label(now), "2 weeks ago");
        assert_eq!(at(now - Duration::days(65)).posted_label(now), "2 months ago");
    }

    #[test]
    fn test_schedule_serializes_with_display_labels() {
        let json = serde_json::to_string(&Schedule::OnSite).unwrap();
        assert_eq!(json, r#""On-site""#);
        assert_eq!(Schedule::Hybrid.label(), "Hybrid");
    }

    #[test]
    fn test_highlights_are_capped_for_display() {
        let highlights = Highlights {
            qualifications: (1..=5).map(|i| format!("q{i}")).collect(),
            responsibilities: vec!["r1".to_string()],
        };
        assert_eq!(highlights.top_qualifications().len(), 3);
        assert_eq!(highlights.top_responsibilities(), &["r1".to_string()]);
    }

    #[test]
    fn test_record_serializes_type_field() {
        let json = serde_json::to_value(record(NO_APPLY_URL, None)).unwrap();
        assert_eq!(json["type"], "Full-time");
        assert_eq!(json["applyUrl"], "#");
    }
}
