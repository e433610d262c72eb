//! Remote profile fetching.
//!
//! This module talks to the GitHub REST API and folds the account
//! summary and repository list into a single [`FetchOutcome`].
//!
//! [`FetchOutcome`]: crate::models::FetchOutcome

pub mod aggregator;
pub mod client;
pub mod error;

pub use aggregator::ProfileAggregator;
pub use client::{ClientConfig, GitHubClient, ProfileSource};
pub use error::FetchError;
