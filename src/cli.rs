//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::fetch::client::MAX_PER_PAGE;
use crate::viewport::ScrollTarget;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio - a personal blog's activity page and post index, in the terminal
///
/// Shows a GitHub account's profile and repositories, or renders an index
/// of already-built blog posts with reading-time glyphs.
///
/// Examples:
///   folio activity
///   folio activity --user octocat --format json
///   folio activity --page --scroll bottom
///   folio posts ./public/posts.json
///   folio --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .folio.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .folio.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show a GitHub account's profile and repositories
    Activity(ActivityArgs),
    /// Render the blog post index
    Posts(PostsArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ActivityArgs {
    /// GitHub account to show
    #[arg(short, long, value_name = "HANDLE", env = "FOLIO_USER")]
    pub user: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Repositories to request (one page, at most 100)
    #[arg(long, value_name = "COUNT")]
    pub per_page: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Show the result in a full-screen pager that follows terminal resizes
    #[arg(long)]
    pub page: bool,

    /// Where the pager scrolls to after drawing (top, bottom)
    #[arg(long, value_name = "TARGET", requires = "page")]
    pub scroll: Option<ScrollTarget>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PostsArgs {
    /// JSON file with an array of posts, or a directory of JSON files
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Output format for rendered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            None => Err("No command given. Try 'folio activity' or 'folio --help'".to_string()),
            Some(Command::Activity(activity)) => activity.validate(),
            Some(Command::Posts(posts)) => {
                if !posts.path.exists() {
                    return Err(format!(
                        "Post metadata path does not exist: {}",
                        posts.path.display()
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

impl ActivityArgs {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref user) = self.user {
            if user.trim().is_empty() {
                return Err("User handle must not be empty".to_string());
            }
        }

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(per_page) = self.per_page {
            if per_page == 0 || per_page > MAX_PER_PAGE {
                return Err(format!("Per-page must be between 1 and {}", MAX_PER_PAGE));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.page && self.format == OutputFormat::Json {
            return Err("--page only works with text output".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity_args() -> ActivityArgs {
        ActivityArgs {
            user: Some("trblackw".to_string()),
            api_url: None,
            per_page: None,
            timeout: None,
            format: OutputFormat::Text,
            page: false,
            scroll: None,
        }
    }

    fn make_args(activity: ActivityArgs) -> Args {
        Args {
            command: Some(Command::Activity(activity)),
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_activity() {
        let args = Args::try_parse_from([
            "folio", "activity", "--user", "octocat", "--page", "--scroll", "bottom",
        ])
        .unwrap();
        match args.command {
            Some(Command::Activity(a)) => {
                assert_eq!(a.user.as_deref(), Some("octocat"));
                assert!(a.page);
                assert_eq!(a.scroll, Some(ScrollTarget::Bottom));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scroll_requires_page() {
        assert!(Args::try_parse_from(["folio", "activity", "--scroll", "top"]).is_err());
    }

    #[test]
    fn test_validation_blank_user() {
        let mut activity = activity_args();
        activity.user = Some("   ".to_string());
        assert!(make_args(activity).validate().is_err());
    }

    #[test]
    fn test_validation_per_page_bounds() {
        let mut activity = activity_args();
        activity.per_page = Some(101);
        assert!(make_args(activity.clone()).validate().is_err());
        activity.per_page = Some(100);
        assert!(make_args(activity).validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut activity = activity_args();
        activity.api_url = Some("api.github.com".to_string());
        assert!(make_args(activity).validate().is_err());
    }

    #[test]
    fn test_validation_missing_command() {
        let mut args = make_args(activity_args());
        args.command = None;
        assert!(args.validate().is_err());
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(activity_args());
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(activity_args());
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
