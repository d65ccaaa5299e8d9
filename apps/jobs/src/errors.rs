use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a search produced no jobs after every provider was tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Every attempted provider answered, but none had matching jobs.
    NoMatches,
    /// At least one provider failed at the transport or decoding level.
    Unreachable,
}

impl UnavailableReason {
    pub fn user_message(&self) -> &'static str {
        match self {
            UnavailableReason::NoMatches => {
                "No jobs found for your search. Try different keywords or location."
            }
            UnavailableReason::Unreachable => {
                "Unable to fetch real jobs. Please check your internet connection and try again."
            }
        }
    }
}

/// Library-level error type.
/// Provider-specific failures never reach this type; see `providers::ProviderError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("All job providers are unavailable ({0:?})")]
    JobsUnavailable(UnavailableReason),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for the view layer.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::JobsUnavailable(UnavailableReason::NoMatches) => "NO_JOBS_FOUND",
            AppError::JobsUnavailable(UnavailableReason::Unreachable) => "JOBS_UNAVAILABLE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Human-readable message. Never names the provider that failed.
    pub fn user_message(&self) -> String {
        match self {
            AppError::JobsUnavailable(reason) => reason.user_message().to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
        }
    }
}
