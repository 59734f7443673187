//! Console presentation of lookup results.
//!
//! `render_*` functions build the labeled lines without touching the
//! terminal; `show_*` print them with colors.

use crate::facebook::{PageInfo, PostsFeed, Profile};
use crate::scan::INFO_LINKS;
use console::style;
use serde_json::Value;

pub const PLACEHOLDER: &str = "N/A";
pub const NO_POSTS_NOTICE: &str = "No posts found (or your plan doesn't include them).";

/// Maximum number of profile photos listed.
const MAX_PHOTOS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Field,
    Info,
    Skipped,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    fn field(label: &str, value: Option<&Value>) -> Self {
        Self::new(Tone::Field, format!("{label}: {}", display_value(value)))
    }

    fn blank() -> Self {
        Self::new(Tone::Field, "")
    }
}

pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Capitalizes the first letter of every word and lowercases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

pub fn intro_card_label(key: &str) -> String {
    title_case(&key.replace("INTRO_CARD_", "").replace('_', " "))
}

pub fn render_profile(profile: &Profile) -> Vec<Line> {
    let mut lines = vec![
        Line::new(Tone::Heading, "Profile details:"),
        Line::blank(),
        Line::field("ID", profile.field("id")),
        Line::field("Type", profile.kind()),
        Line::field("Name", profile.field("name")),
        Line::field("Gender", profile.field("gender")),
        Line::field("Profile picture", profile.field("profile_picture")),
        Line::field("Cover photo", profile.field("cover_photo")),
    ];

    if let Some(cards) = profile.intro_cards().filter(|c| !c.is_empty()) {
        lines.push(Line::blank());
        lines.push(Line::new(Tone::Field, "Additional details:"));
        for (key, value) in cards {
            lines.push(Line::new(
                Tone::Field,
                format!(" - {}: {}", intro_card_label(key), display_value(Some(value))),
            ));
        }
    }

    let photos = profile.photos();
    if !photos.is_empty() {
        lines.push(Line::blank());
        lines.push(Line::new(Tone::Field, "Photos:"));
        for photo in photos.iter().take(MAX_PHOTOS) {
            lines.push(Line::new(
                Tone::Field,
                format!(
                    " - {} (ID: {})",
                    display_value(photo.uri()),
                    display_value(photo.id())
                ),
            ));
        }
    }

    lines
}

pub fn render_page(page: &PageInfo) -> Vec<Line> {
    vec![
        Line::new(Tone::Heading, "Page details:"),
        Line::blank(),
        Line::field("Title", page.field("title")),
        Line::field("Description", page.field("description")),
        Line::field("Image", page.field("image")),
        Line::field("URL", page.field("url")),
        Line::field("User ID", page.field("user_id")),
        Line::field("Redirected to", page.field("redirected_url")),
    ]
}

pub fn render_posts(feed: &PostsFeed) -> Vec<Line> {
    let posts = feed.posts();
    if posts.is_empty() {
        return vec![Line::new(Tone::Failure, NO_POSTS_NOTICE)];
    }

    let mut lines = vec![Line::new(Tone::Heading, "Posts details:"), Line::blank()];
    for post in posts {
        lines.push(Line::field("Post ID", post.post_id()));
        lines.push(Line::field("Text", post.text()));
        lines.push(Line::field("Total reactions", post.total_reactions()));
        lines.push(Line::field("Comments", post.comments_count()));
        lines.push(Line::field("Shares", post.share_count()));

        for uri in post.attachments().iter().filter_map(|a| a.photo_uri()) {
            lines.push(Line::new(Tone::Field, format!(" - Image: {}", display_value(uri))));
        }
        lines.push(Line::blank());
    }
    lines
}

pub fn render_banner() -> Vec<Line> {
    let mut lines = vec![
        Line::new(
            Tone::Heading,
            format!("meta_scan v{}", env!("CARGO_PKG_VERSION")),
        ),
        Line::new(Tone::Info, "Facebook profile, page and post lookup via RapidAPI"),
    ];
    for (label, url) in INFO_LINKS {
        lines.push(Line::new(Tone::Info, format!("  {label}: {url}")));
    }
    lines
}

pub fn print_line(line: &Line) {
    let styled = match line.tone {
        Tone::Heading => style(&line.text).green().bold(),
        Tone::Field => style(&line.text).yellow(),
        Tone::Info => style(&line.text).cyan(),
        Tone::Skipped => style(&line.text).yellow().dim(),
        Tone::Failure => style(&line.text).red(),
    };
    println!("{styled}");
}

pub fn print_lines(lines: &[Line]) {
    println!();
    for line in lines {
        print_line(line);
    }
}

pub fn show_profile(profile: &Profile) {
    print_lines(&render_profile(profile));
}

pub fn show_page(page: &PageInfo) {
    print_lines(&render_page(page));
}

pub fn show_posts(feed: &PostsFeed) {
    print_lines(&render_posts(feed));
}

pub fn show_banner() {
    for line in render_banner() {
        print_line(&line);
    }
}

pub fn info(message: impl Into<String>) {
    print_lines(&[Line::new(Tone::Info, message)]);
}

pub fn skipped(message: impl Into<String>) {
    print_lines(&[Line::new(Tone::Skipped, message)]);
}

pub fn failure(message: impl Into<String>) {
    print_lines(&[Line::new(Tone::Failure, message)]);
}
