pub mod job;

pub use job::{Highlights, JobRecord, Schedule};
