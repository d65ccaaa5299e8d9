//! Job Fetch Orchestrator: tries providers in priority order and returns
//! the first non-empty result set.
//!
//! Provider failures are logged and swallowed; callers only ever see one
//! `AppError::JobsUnavailable` when the whole chain comes up empty.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{AppError, UnavailableReason};
use crate::models::JobRecord;
use crate::providers::adzuna::AdzunaProvider;
use crate::providers::{
    build_http_client, JSearchProvider, JobProvider, MuseProvider, ProviderError,
};

#[derive(Clone)]
pub struct JobFetcher {
    providers: Vec<Arc<dyn JobProvider>>,
}

impl JobFetcher {
    /// Providers are tried in the order given.
    pub fn new(providers: Vec<Arc<dyn JobProvider>>) -> Self {
        Self { providers }
    }

    /// The standard chain: The Muse, then JSearch, then Adzuna.
    pub fn from_config(config: &Config) -> Self {
        let client = build_http_client(Duration::from_secs(config.http_timeout_secs));
        let adzuna_credentials = AdzunaProvider::credentials_from(
            config.adzuna_app_id.clone(),
            config.adzuna_app_key.clone(),
        );

        Self::new(vec![
            Arc::new(MuseProvider::new(client.clone())),
            Arc::new(JSearchProvider::new(
                client.clone(),
                config.rapidapi_key.clone(),
            )),
            Arc::new(AdzunaProvider::new(
                client,
                adzuna_credentials,
                &config.adzuna_country,
            )),
        ])
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Fetches jobs from the first provider that has any.
    pub async fn fetch(
        &self,
        query: &str,
        location: Option<&str>,
    ) -> Result<Vec<JobRecord>, AppError> {
        let query = query.trim();
        let location = location.map(str::trim).filter(|l| !l.is_empty());
        let mut transport_failure = false;

        for provider in &self.providers {
            if !provider.is_eligible() {
                debug!("Skipping {}: not configured", provider.name());
                continue;
            }

            info!("Fetching jobs from {} (query={query:?}, location={location:?})", provider.name());

            match attempt(provider.as_ref(), query, location).await {
                Ok(jobs) => {
                    info!("Fetched {} jobs from {}", jobs.len(), provider.name());
                    return Ok(jobs);
                }
                Err(ProviderError::NoResults) => {
                    info!("{} returned no jobs, trying next provider", provider.name());
                }
                Err(e) => {
                    warn!("{} failed: {e}", provider.name());
                    transport_failure = true;
                }
            }
        }

        let reason = if transport_failure {
            UnavailableReason::Unreachable
        } else {
            UnavailableReason::NoMatches
        };
        warn!("All job providers exhausted ({reason:?})");
        Err(AppError::JobsUnavailable(reason))
    }
}

/// One provider call; an empty list counts as `NoResults`.
async fn attempt(
    provider: &dyn JobProvider,
    query: &str,
    location: Option<&str>,
) -> Result<Vec<JobRecord>, ProviderError> {
    let jobs = provider.fetch(query, location).await?;
    if jobs.is_empty() {
        return Err(ProviderError::NoResults);
    }
    Ok(jobs)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::models::job::{DEFAULT_JOB_TYPE, NOT_SPECIFIED, NO_APPLY_URL};

    pub(crate) fn job(id: &str, title: &str, location: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: location.to_string(),
            description: String::new(),
            job_type: DEFAULT_JOB_TYPE.to_string(),
            salary: NOT_SPECIFIED.to_string(),
            date_posted: None,
            apply_url: NO_APPLY_URL.to_string(),
            logo: None,
            level: NOT_SPECIFIED.to_string(),
            schedule: None,
            highlights: None,
            category: None,
        }
    }

    enum Behavior {
        Jobs(usize),
        Empty,
        Fail,
    }

    struct StubProvider {
        name: &'static str,
        eligible: bool,
        behavior: Behavior,
        calls: AtomicUsize,
        last_location: Mutex<Option<String>>,
    }

    impl StubProvider {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                eligible: true,
                behavior,
                calls: AtomicUsize::new(0),
                last_location: Mutex::new(None),
            })
        }

        fn unconfigured(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                eligible: false,
                behavior: Behavior::Jobs(1),
                calls: AtomicUsize::new(0),
                last_location: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_eligible(&self) -> bool {
            self.eligible
        }

        async fn fetch(
            &self,
            _query: &str,
            location: Option<&str>,
        ) -> Result<Vec<JobRecord>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_location.lock().unwrap() = location.map(str::to_string);
            match self.behavior {
                Behavior::Jobs(n) => Ok((0..n)
                    .map(|i| job(&format!("{}-{i}", self.name), "Engineer", "Remote"))
                    .collect()),
                Behavior::Empty => Ok(vec![]),
                Behavior::Fail => Err(ProviderError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    fn fetcher(providers: &[Arc<StubProvider>]) -> JobFetcher {
        JobFetcher::new(
            providers
                .iter()
                .map(|p| p.clone() as Arc<dyn JobProvider>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_primary_success_short_circuits_fallbacks() {
        let primary = StubProvider::new("primary", Behavior::Jobs(5));
        let fallback_a = StubProvider::new("a", Behavior::Jobs(3));
        let fallback_b = StubProvider::new("b", Behavior::Jobs(2));

        let jobs = fetcher(&[primary.clone(), fallback_a.clone(), fallback_b.clone()])
            .fetch("rust", None)
            .await
            .unwrap();

        assert_eq!(jobs.len(), 5);
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback_a.calls(), 0);
        assert_eq!(fallback_b.calls(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_next() {
        let primary = StubProvider::new("primary", Behavior::Fail);
        let fallback_a = StubProvider::new("a", Behavior::Jobs(3));
        let fallback_b = StubProvider::new("b", Behavior::Jobs(2));

        let jobs = fetcher(&[primary.clone(), fallback_a.clone(), fallback_b.clone()])
            .fetch("rust", None)
            .await
            .unwrap();

        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|j| j.id.starts_with("a-")));
        assert_eq!(fallback_b.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_primary_falls_back_to_next() {
        let primary = StubProvider::new("primary", Behavior::Empty);
        let fallback_a = StubProvider::new("a", Behavior::Jobs(2));

        let jobs = fetcher(&[primary, fallback_a]).fetch("rust", None).await.unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_all_failing_is_unreachable() {
        let providers = [
            StubProvider::new("primary", Behavior::Fail),
            StubProvider::new("a", Behavior::Empty),
            StubProvider::new("b", Behavior::Fail),
        ];

        let err = fetcher(&providers).fetch("rust", None).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::JobsUnavailable(UnavailableReason::Unreachable)
        ));
        assert!(providers.iter().all(|p| p.calls() == 1));
    }

    #[tokio::test]
    async fn test_all_empty_is_no_matches() {
        let providers = [
            StubProvider::new("primary", Behavior::Empty),
            StubProvider::new("a", Behavior::Empty),
        ];

        let err = fetcher(&providers).fetch("rust", None).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::JobsUnavailable(UnavailableReason::NoMatches)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_providers_are_skipped() {
        let primary = StubProvider::new("primary", Behavior::Empty);
        let unconfigured = StubProvider::unconfigured("a");
        let fallback_b = StubProvider::new("b", Behavior::Jobs(1));

        let jobs = fetcher(&[primary, unconfigured.clone(), fallback_b])
            .fetch("rust", None)
            .await
            .unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(unconfigured.calls(), 0);
    }

    #[tokio::test]
    async fn test_only_unconfigured_fallbacks_is_no_matches() {
        let providers = [
            StubProvider::new("primary", Behavior::Empty),
            StubProvider::unconfigured("a"),
            StubProvider::unconfigured("b"),
        ];

        let err = fetcher(&providers).fetch("rust", None).await.unwrap_err();
        assert_eq!(err.code(), "NO_JOBS_FOUND");
    }

    #[tokio::test]
    async fn test_blank_location_is_treated_as_absent() {
        let primary = StubProvider::new("primary", Behavior::Jobs(1));
        fetcher(&[primary.clone()]).fetch("rust", Some("   ")).await.unwrap();
        assert_eq!(*primary.last_location.lock().unwrap(), None);
    }

    #[test]
    fn test_standard_chain_order() {
        let fetcher = JobFetcher::from_config(&Config::default());
        assert_eq!(fetcher.provider_names(), vec!["The Muse", "JSearch", "Adzuna"]);
    }
}
