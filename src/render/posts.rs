//! Post index rendering.
//!
//! Post metadata arrives already resolved by the content pipeline as JSON,
//! either one file holding an array or a directory of files.

use crate::format::{bucket_reading_time, format_timestamp};
use crate::models::PostMeta;
use crate::render::{wrap, Layout};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Deserialize)]
#[serde(untagged)]
enum PostFile {
    Many(Vec<PostMeta>),
    One(PostMeta),
}

/// Load post metadata from a JSON file or a directory of JSON files.
pub fn load_posts(path: &Path) -> Result<Vec<PostMeta>> {
    if !path.exists() {
        anyhow::bail!("Post metadata path does not exist: {}", path.display());
    }

    if path.is_file() {
        return parse_post_file(path);
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk post directory: {}", path.display()))?;
        let is_json = entry.path().extension().and_then(|e| e.to_str()) == Some("json");
        if entry.file_type().is_file() && is_json {
            posts.extend(parse_post_file(entry.path())?);
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }

    info!("Loaded {} posts from {}", posts.len(), path.display());
    Ok(posts)
}

fn parse_post_file(path: &Path) -> Result<Vec<PostMeta>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read post metadata: {}", path.display()))?;
    let parsed: PostFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse post metadata: {}", path.display()))?;

    Ok(match parsed {
        PostFile::Many(posts) => posts,
        PostFile::One(post) => vec![post],
    })
}

/// Newest first; posts with unreadable dates go last.
pub fn sort_newest_first(posts: &mut [PostMeta]) {
    posts.sort_by(|a, b| b.date.to_datetime().cmp(&a.date.to_datetime()));
}

/// Render the post index as lines of text.
pub fn render_posts_text(posts: &[PostMeta], layout: &Layout, glyph: &str) -> Vec<String> {
    let pad = layout.pad();
    let mut lines = Vec::new();

    if posts.is_empty() {
        lines.push(format!("{}No posts yet.", pad));
        return lines;
    }

    for post in posts {
        lines.push(format!("{}{}", pad, post.display_title()));
        lines.push(format!(
            "{}{} · {}",
            pad,
            format_timestamp(&post.date),
            bucket_reading_time(&post.reading_time.text, glyph)
        ));
        if let Some(summary) = post.summary() {
            lines.extend(
                wrap(summary, layout.width)
                    .into_iter()
                    .map(|l| format!("{}{}", pad, l)),
            );
        }
        lines.push(String::new());
    }
    lines
}

/// Render the post index as pretty-printed JSON.
pub fn render_posts_json(posts: &[PostMeta], glyph: &str) -> Result<String> {
    let entries: Vec<_> = posts
        .iter()
        .map(|post| {
            json!({
                "title": post.display_title(),
                "slug": post.slug,
                "date": format_timestamp(&post.date),
                "reading_time": bucket_reading_time(&post.reading_time.text, glyph),
                "description": post.summary(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&entries).context("Failed to serialize post index")
}
