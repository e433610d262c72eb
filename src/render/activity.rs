//! Activity view rendering.
//!
//! Produces the profile block and repository list for a successful fetch,
//! or the apology for a failed one.

use crate::format::{format_timestamp, Timestamp};
use crate::models::{FetchOutcome, ProfileSummary, RepositoryEntry};
use crate::render::{wrap, Layout};
use anyhow::{Context, Result};
use serde_json::json;

/// Message shown when the fetch fails.
pub const APOLOGY: &str =
    "Doh! Something went wrong with the network request. Mind letting me know?";

/// Inputs for rendering the activity view.
#[derive(Debug, Clone, Copy)]
pub struct ActivityView<'a> {
    pub layout: Layout,
    pub contact_email: &'a str,
}

/// Render the activity view as lines of text.
pub fn render_activity_text(outcome: &FetchOutcome, view: &ActivityView<'_>) -> Vec<String> {
    let body = match outcome {
        FetchOutcome::Loading => vec!["Loading…".to_string()],
        FetchOutcome::Success { summary, repos } => {
            let mut lines = profile_block(summary, view.layout.width);
            lines.push(String::new());
            lines.extend(repository_list(repos, view.layout.width));
            lines
        }
        FetchOutcome::Failure { .. } => {
            let mut lines = wrap(APOLOGY, view.layout.width);
            lines.push(view.contact_email.to_string());
            lines
        }
    };

    let pad = view.layout.pad();
    body.into_iter()
        .map(|line| {
            if line.is_empty() {
                line
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect()
}

fn profile_block(summary: &ProfileSummary, width: usize) -> Vec<String> {
    let mut lines = vec![summary.handle.clone()];
    if !summary.html_url.is_empty() {
        lines.push(summary.html_url.clone());
    }
    lines.push(format!("Followers: {}", summary.follower_count));
    lines.push(format!("Following: {}", summary.following_count));
    lines.push(format!(
        "Joined: {}",
        format_timestamp(&Timestamp::from(summary.created_at.as_str()))
    ));
    lines.push(format!("Repos: {}", summary.public_repo_count));

    if let Some(company) = summary.company.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(format!("Company: {}", company.trim()));
    }
    if let Some(bio) = summary.bio.as_deref() {
        let bio = wrap(bio, width);
        if !bio.is_empty() {
            lines.push(String::new());
            lines.extend(bio);
        }
    }
    lines
}

fn repository_list(repos: &[RepositoryEntry], width: usize) -> Vec<String> {
    let rule = "─".repeat(width);
    let inner = width.saturating_sub(2);
    let mut lines = Vec::new();

    if repos.is_empty() {
        lines.push("No public repositories.".to_string());
        return lines;
    }

    for (i, repo) in repos.iter().enumerate() {
        lines.push(repo.name.clone());
        if let Some(description) = repo.description.as_deref() {
            lines.extend(wrap(description, inner).into_iter().map(|l| format!("  {}", l)));
        }

        let updated = format!(
            "Last updated: {}",
            format_timestamp(&Timestamp::from(repo.updated_at.as_str()))
        );
        match repo.primary_language.as_deref() {
            Some(language) => lines.push(format!("  ✏️ {}   {}", language, updated)),
            None => lines.push(format!("  {}", updated)),
        }

        if let Some(hosted) = repo.hosted_url() {
            lines.push(format!("  🔗 Hosted url: {}", hosted));
        }

        if i + 1 < repos.len() {
            lines.push(rule.clone());
        }
    }
    lines
}

/// Render the activity view as pretty-printed JSON.
pub fn render_activity_json(outcome: &FetchOutcome, contact_email: &str) -> Result<String> {
    let value = match outcome {
        FetchOutcome::Loading => json!({ "status": "loading" }),
        FetchOutcome::Success { summary, repos } => json!({
            "status": "success",
            "profile": summary,
            "joined": format_timestamp(&Timestamp::from(summary.created_at.as_str())),
            "repositories": repos,
        }),
        FetchOutcome::Failure { cause } => json!({
            "status": "failure",
            "kind": cause.kind(),
            "message": APOLOGY,
            "contact": contact_email,
        }),
    };

    serde_json::to_string_pretty(&value).context("Failed to serialize activity view")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;

    fn summary() -> ProfileSummary {
        ProfileSummary {
            handle: "trblackw".to_string(),
            avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
            html_url: "https://github.com/trblackw".to_string(),
            bio: Some("I like to learn, build and write about things.".to_string()),
            company: None,
            follower_count: 12,
            following_count: 3,
            public_repo_count: 2,
            created_at: "2016-04-02T18:21:09Z".to_string(),
            updated_at: "2020-11-01T10:00:00Z".to_string(),
        }
    }

    fn repo(id: u64, name: &str, homepage: Option<&str>) -> RepositoryEntry {
        RepositoryEntry {
            id,
            name: name.to_string(),
            primary_language: Some("TypeScript".to_string()),
            url: format!("https://github.com/trblackw/{}", name),
            updated_at: "2020-10-10T00:00:00Z".to_string(),
            description: Some(format!("{} description", name)),
            homepage_url: homepage.map(String::from),
        }
    }

    fn view() -> ActivityView<'static> {
        ActivityView {
            layout: Layout {
                width: 40,
                indent: 2,
                height: 0,
            },
            contact_email: "me@example.com",
        }
    }

    #[test]
    fn test_success_renders_profile_and_repos_in_order() {
        let outcome = FetchOutcome::Success {
            summary: summary(),
            repos: vec![repo(2, "zeta", None), repo(1, "alpha", Some("https://alpha.dev"))],
        };
        let lines = render_activity_text(&outcome, &view());
        let text = lines.join("\n");

        assert!(text.contains("  trblackw"));
        assert!(text.contains("Joined: 4/2/2016"));
        assert!(text.contains("✏️ TypeScript   Last updated: 10/10/2020"));
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
        assert_eq!(text.matches("Hosted url").count(), 1);
        // One rule between the two repositories
        let rule = format!("  {}", "─".repeat(40));
        assert_eq!(lines.iter().filter(|l| **l == rule).count(), 1);
    }

    #[test]
    fn test_failure_renders_apology_with_contact() {
        let outcome = FetchOutcome::Failure {
            cause: FetchError::upstream("https://api.github.com/users/trblackw", 500, "oops"),
        };
        let text = render_activity_text(&outcome, &view()).join("\n");
        assert!(text.contains("Doh! Something went wrong"));
        assert!(text.contains("me@example.com"));
        assert!(!text.contains("oops"));
    }

    #[test]
    fn test_json_output() {
        let outcome = FetchOutcome::Success {
            summary: summary(),
            repos: vec![repo(1, "alpha", None)],
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_activity_json(&outcome, "me@example.com").unwrap())
                .unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["profile"]["login"], "trblackw");
        assert_eq!(value["joined"], "4/2/2016");
        assert_eq!(value["repositories"][0]["html_url"], "https://github.com/trblackw/alpha");

        let failure = FetchOutcome::Failure {
            cause: FetchError::Interrupted,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_activity_json(&failure, "me@example.com").unwrap())
                .unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["contact"], "me@example.com");
    }
}
