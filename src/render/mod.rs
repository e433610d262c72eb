//! Text and JSON rendering of the views.

pub mod activity;
pub mod posts;
pub mod typography;

pub use activity::{render_activity_json, render_activity_text, ActivityView};
pub use posts::{load_posts, render_posts_json, render_posts_text, sort_newest_first};
pub use typography::{Layout, Typography};

/// Greedy word wrap on character counts. Words longer than `width` are
/// kept whole on their own line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
