//! Job search engine: fetches postings from a prioritized chain of public
//! job boards, normalizes them into one record shape, cleans their
//! descriptions and filters them for display.

pub mod config;
pub mod description;
pub mod errors;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod providers;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use errors::{AppError, UnavailableReason};
pub use fetcher::JobFetcher;
pub use filter::{apply_filters, FilterState, SearchState};
pub use models::JobRecord;
pub use state::{derive_visible_jobs, reduce, BoardEvent, BoardState, JobBoard};
