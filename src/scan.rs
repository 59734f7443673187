use crate::client::RapidApiClient;
use crate::config::Credentials;
use crate::display::{failure, info, show_page, show_posts, show_profile, skipped};
use crate::error::MetaScanError;
use crate::facebook::{
    PageInfo, PostsFeed, Profile, get_page_details, get_posts_details, get_profile_details,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{info as log_info, warn};

/// Links surfaced at the end of a run: where keys and plan subscriptions are managed.
pub const INFO_LINKS: [(&str, &str); 2] = [
    ("RapidAPI Hub", "https://rapidapi.com/hub"),
    ("RapidAPI docs", "https://docs.rapidapi.com/"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub skip_page: bool,
    pub skip_posts: bool,
}

#[derive(Debug)]
pub enum LookupOutcome<T> {
    Found(T),
    NoData,
    Failed(MetaScanError),
    Skipped,
}

impl<T> LookupOutcome<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            LookupOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&MetaScanError> {
        match self {
            LookupOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, LookupOutcome::Skipped)
    }
}

#[derive(Debug)]
pub struct ScanReport {
    pub profile: LookupOutcome<Profile>,
    pub page: LookupOutcome<PageInfo>,
    pub posts: LookupOutcome<PostsFeed>,
}

async fn with_spinner<T>(message: &'static str, fut: impl Future<Output = T>) -> T {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    pb.finish_and_clear();
    output
}

fn report<T>(
    lookup: &str,
    result: Result<Option<T>, MetaScanError>,
    show: fn(&T),
    empty_message: &str,
) -> LookupOutcome<T> {
    match result {
        Ok(Some(record)) => {
            show(&record);
            LookupOutcome::Found(record)
        }
        Ok(None) => {
            failure(empty_message);
            LookupOutcome::NoData
        }
        Err(err) => {
            warn!(lookup, error = %err, "lookup failed");
            failure(failure_message(lookup, &err));
            LookupOutcome::Failed(err)
        }
    }
}

fn failure_message(lookup: &str, err: &MetaScanError) -> String {
    if err.is_network() {
        format!("Network error getting {lookup} details: {err}")
    } else {
        format!("Error getting {lookup} details: {err}")
    }
}

/// Runs the profile, page and posts lookups one after another.
///
/// A failing lookup is reported and recorded in the returned report; it never
/// stops the lookups that follow.
pub async fn run_scan(
    client: &RapidApiClient,
    credentials: &Credentials,
    username: &str,
    options: ScanOptions,
) -> ScanReport {
    log_info!(username, "starting scan");

    let result = with_spinner(
        "Fetching profile details...",
        get_profile_details(client, username, credentials.profile_key()),
    )
    .await;
    let profile = report(
        "profile",
        result,
        show_profile,
        "No profile obtained (empty response).",
    );

    let page = if options.skip_page {
        skipped("[Skipped] Page details via --no-page");
        LookupOutcome::Skipped
    } else {
        let result = with_spinner(
            "Fetching page details...",
            get_page_details(client, username, credentials.social_key()),
        )
        .await;
        report(
            "page",
            result,
            show_page,
            "Could not fetch page details (maybe a premium endpoint).",
        )
    };

    let posts = if options.skip_posts {
        skipped("[Skipped] Posts details via --no-posts");
        LookupOutcome::Skipped
    } else {
        let result = with_spinner(
            "Fetching posts...",
            get_posts_details(client, username, credentials.social_key()),
        )
        .await;
        report(
            "posts",
            result,
            show_posts,
            "Could not fetch posts (maybe a premium endpoint).",
        )
    };

    ScanReport {
        profile,
        page,
        posts,
    }
}

fn opener_command(url: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    let status = opener_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("opener exited with {status}")))
    }
}

/// Prints each link and asks the platform opener to show it.
pub fn open_links(links: &[(&str, &str)]) {
    for (label, url) in links {
        info(format!("Opening {label}: {url}"));
        if let Err(err) = open_in_browser(url) {
            warn!(url, error = %err, "could not open link");
            failure(format!("Failed to open link, visit it manually: {url} ({err})"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_outcome_accessors() {
        let found: LookupOutcome<u8> = LookupOutcome::Found(7);
        assert_eq!(found.found(), Some(&7));
        assert!(found.error().is_none());

        let failed: LookupOutcome<u8> = LookupOutcome::Failed(MetaScanError::MissingCredentials);
        assert!(failed.found().is_none());
        assert!(failed.error().is_some());

        assert!(LookupOutcome::<u8>::Skipped.is_skipped());
        assert!(!LookupOutcome::<u8>::NoData.is_skipped());
    }

    #[test]
    fn test_report_keeps_error() {
        let outcome = report::<u8>(
            "profile",
            Err(MetaScanError::ReadTimeout {
                host: "h".to_string(),
            }),
            |_| {},
            "none",
        );
        assert!(matches!(outcome.error(), Some(MetaScanError::ReadTimeout { .. })));
    }

    #[test]
    fn test_failure_message_names_network_errors() {
        let timeout = MetaScanError::ReadTimeout {
            host: "h".to_string(),
        };
        assert!(
            failure_message("page", &timeout).starts_with("Network error getting page details")
        );

        let forbidden = MetaScanError::Http {
            status: 403,
            host: "h".to_string(),
            path: "/p".to_string(),
            details: "{}".to_string(),
        };
        assert!(failure_message("page", &forbidden).starts_with("Error getting page details"));
    }

    #[test]
    fn test_report_no_data() {
        let outcome = report::<u8>("page", Ok(None), |_| {}, "none");
        assert!(matches!(outcome, LookupOutcome::NoData));
    }

    #[test]
    fn test_info_links_are_https() {
        for (_, url) in INFO_LINKS {
            assert!(url.starts_with("https://"));
        }
    }
}
