//! Folio - a personal blog's activity page and post index, in the terminal
//!
//! Fetches a GitHub account's profile and repositories and renders them,
//! or renders an index of already-built blog posts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, unreadable post metadata, etc.)
//!   3 - The activity fetch failed (the apology is still printed)
//!   130 - Interrupted with Ctrl-C before the fetch settled

mod cli;
mod config;
mod fetch;
mod format;
mod models;
mod render;
mod viewport;

use anyhow::{Context, Result};
use cli::{ActivityArgs, Args, Command, OutputFormat, PostsArgs};
use config::{Config, CONFIG_FILE};
use fetch::{ClientConfig, GitHubClient, ProfileAggregator};
use futures::FutureExt;
use indicatif::{ProgressBar, ProgressStyle};
use models::FetchOutcome;
use render::{ActivityView, Typography};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use viewport::terminal::{self, AlternateScreen, Pager, TerminalSurface};
use viewport::{smooth_scroll_until, Dimensions, ResizeBus, ViewportSubscription, ViewportTracker};

/// Exit code when the activity fetch ends in failure.
const EXIT_FETCH_FAILED: i32 = 3;

/// Exit code when Ctrl-C arrives while the fetch is still loading.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("folio v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("folio failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .folio.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to change the account, contact address, glyph and layout.");
    Ok(())
}

/// Initialize logging based on verbosity settings. Logs go to stderr.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match args.command {
        Some(Command::Activity(ref activity)) => run_activity(&config, activity, args.quiet).await,
        Some(Command::Posts(ref posts)) => run_posts(&config, posts),
        None => Ok(0),
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Fetch and show the activity view. Returns exit code (0, 3 or 130).
async fn run_activity(config: &Config, args: &ActivityArgs, quiet: bool) -> Result<i32> {
    let client = GitHubClient::new(ClientConfig::from(&config.profile))?;
    let aggregator = ProfileAggregator::new(Arc::new(client), config.profile.handle.clone())?;

    let bus = ResizeBus::new();
    let resize_feed = terminal::spawn_resize_feed(Arc::clone(&bus));
    let tracker = ViewportTracker::new(TerminalSurface::detect(), Arc::clone(&bus));
    let mut viewport = tracker.subscribe();
    debug!("Viewport: {:?}", viewport.current());

    let spinner = if !quiet && args.format == OutputFormat::Text && std::io::stderr().is_terminal()
    {
        Some(loading_spinner(aggregator.handle()))
    } else {
        None
    };

    let mut activation = aggregator.activate();
    let interrupted = tokio::select! {
        _ = activation.settle() => false,
        Ok(()) = tokio::signal::ctrl_c() => true,
    };

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if interrupted && !activation.current().is_settled() {
        warn!("Interrupted while loading; discarding the pending fetch");
        // The detached fetch finishes in the background and its result is dropped
        drop(activation.deactivate());
        viewport.unsubscribe();
        if let Some(feed) = resize_feed {
            feed.abort();
        }
        return Ok(EXIT_INTERRUPTED);
    }
    let outcome = activation.into_outcome().await;

    let contact = config.profile.contact_email.as_str();
    match args.format {
        OutputFormat::Json => println!("{}", render::render_activity_json(&outcome, contact)?),
        OutputFormat::Text if args.page && viewport.current().height > 0 => {
            page_activity(&outcome, config, args, &mut viewport).await?;
        }
        OutputFormat::Text => {
            if args.page {
                warn!("No interactive terminal; printing instead of paging");
            }
            let view = ActivityView {
                layout: config.typography.layout(viewport.current()),
                contact_email: contact,
            };
            for line in render::render_activity_text(&outcome, &view) {
                println!("{}", line);
            }
        }
    }

    viewport.unsubscribe();
    if let Some(feed) = resize_feed {
        feed.abort();
    }

    Ok(match outcome {
        FetchOutcome::Failure { .. } => EXIT_FETCH_FAILED,
        _ => 0,
    })
}

fn loading_spinner(handle: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching activity for {}…", handle));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Show the activity view in a full-screen pager until Ctrl-C, re-laying
/// it out whenever the terminal is resized.
async fn page_activity(
    outcome: &FetchOutcome,
    config: &Config,
    args: &ActivityArgs,
    viewport: &mut ViewportSubscription,
) -> Result<()> {
    let typography: &Typography = &config.typography;
    let contact = config.profile.contact_email.as_str();
    let lines_for = |dims: Dimensions| {
        let view = ActivityView {
            layout: typography.layout(dims),
            contact_email: contact,
        };
        render::render_activity_text(outcome, &view)
    };

    // One Ctrl-C listener for the whole pager session. The first poll
    // installs the handler, so it must happen before the screen switch.
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    if let Some(result) = (&mut interrupt).now_or_never() {
        result.context("Failed to listen for Ctrl-C")?;
        return Ok(());
    }

    let _screen = AlternateScreen::enter()?;
    let dims = viewport.current();
    let mut pager = Pager::new(std::io::stdout(), lines_for(dims), usize::from(dims.height));
    pager.draw().context("Failed to draw pager")?;

    let finished = smooth_scroll_until(
        &mut pager,
        args.scroll.unwrap_or_default(),
        config.display.scroll_motion(),
        &mut interrupt,
    )
    .await
    .context("Failed to scroll pager")?;
    if !finished {
        debug!("Ctrl-C received while scrolling, closing pager");
        return Ok(());
    }

    loop {
        tokio::select! {
            _ = &mut interrupt => {
                debug!("Ctrl-C received, closing pager");
                break;
            }
            changed = viewport.changed() => match changed {
                Some(dims) => {
                    debug!("Re-laying out for {:?}", dims);
                    pager
                        .relayout(lines_for(dims), usize::from(dims.height))
                        .context("Failed to redraw pager")?;
                }
                None => break,
            },
        }
    }

    Ok(())
}

/// Render the post index.
fn run_posts(config: &Config, args: &PostsArgs) -> Result<i32> {
    let mut posts = render::load_posts(&args.path)?;
    render::sort_newest_first(&mut posts);

    let glyph = config.display.reading_glyph.as_str();
    match args.format {
        OutputFormat::Json => println!("{}", render::render_posts_json(&posts, glyph)?),
        OutputFormat::Text => {
            let bus = ResizeBus::new();
            let tracker = ViewportTracker::new(TerminalSurface::detect(), bus);
            let layout = config.typography.layout(tracker.subscribe().current());
            for line in render::render_posts_text(&posts, &layout, glyph) {
                println!("{}", line);
            }
        }
    }

    Ok(0)
}
