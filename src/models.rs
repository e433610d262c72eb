//! Data models for the activity view and the post index.
//!
//! Field names on the wire follow the upstream GitHub REST API exactly
//! (case-sensitive); the Rust names are mapped with serde renames.

use crate::fetch::FetchError;
use crate::format::Timestamp;
use serde::{Deserialize, Serialize};

/// Aggregate profile fields for one account (`GET /users/{handle}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Account login.
    #[serde(rename = "login")]
    pub handle: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Public profile page.
    #[serde(default)]
    pub html_url: String,
    /// Free-form bio. GitHub sends `null` when unset.
    #[serde(default)]
    pub bio: Option<String>,
    /// Company line. GitHub sends `null` when unset.
    #[serde(default)]
    pub company: Option<String>,
    #[serde(rename = "followers")]
    pub follower_count: u64,
    #[serde(rename = "following")]
    pub following_count: u64,
    #[serde(rename = "public_repos")]
    pub public_repo_count: u64,
    /// ISO-8601 creation time.
    pub created_at: String,
    /// ISO-8601 last update time.
    pub updated_at: String,
}

/// One entry of `GET /users/{handle}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub id: u64,
    pub name: String,
    #[serde(rename = "language", default)]
    pub primary_language: Option<String>,
    #[serde(rename = "html_url")]
    pub url: String,
    pub updated_at: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "homepage", default)]
    pub homepage_url: Option<String>,
}

impl RepositoryEntry {
    /// Hosted URL, if the repository advertises a non-empty one.
    pub fn hosted_url(&self) -> Option<&str> {
        self.homepage_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// State of one activation of the activity view.
///
/// Starts as `Loading` and moves exactly once to `Success` or `Failure`.
#[derive(Debug, Default)]
pub enum FetchOutcome {
    #[default]
    Loading,
    Success {
        summary: ProfileSummary,
        repos: Vec<RepositoryEntry>,
    },
    Failure {
        cause: FetchError,
    },
}

impl FetchOutcome {
    /// Returns true once the outcome is no longer `Loading`.
    pub fn is_settled(&self) -> bool {
        !matches!(self, FetchOutcome::Loading)
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Loading => "loading",
            FetchOutcome::Success { .. } => "success",
            FetchOutcome::Failure { .. } => "failure",
        }
    }
}

/// Reading-time block as produced by the content pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingTime {
    /// Text of the form `"<N> min read"`.
    pub text: String,
}

/// Already-resolved metadata for one blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    #[serde(default)]
    pub title: Option<String>,
    /// Either epoch seconds or an ISO-8601 string.
    pub date: Timestamp,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub slug: String,
    #[serde(rename = "readingTime")]
    pub reading_time: ReadingTime,
}

impl PostMeta {
    /// Title to display, falling back to the slug.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.slug)
    }

    /// Summary line: the description, else the excerpt.
    pub fn summary(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(self.excerpt.as_deref())
    }
}
