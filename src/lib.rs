//! Facebook profile, page and post lookups through RapidAPI providers.
//!
//! The library exposes a retrying [`RapidApiClient`], one normalizing lookup
//! per data kind, console rendering, and JSON persistence. The `meta_scan`
//! binary sequences them into a best-effort scan.

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod facebook;
pub mod output;
pub mod scan;

pub use client::{RapidApiClient, RetryPolicy};
pub use config::{ClientConfig, Credentials, choose_key};
pub use error::MetaScanError;
pub use facebook::{
    JsonShape, PageInfo, PostsFeed, Profile, get_page_details, get_posts_details,
    get_profile_details, parse_page_response, parse_posts_response, parse_profile_response,
};
pub use output::save_json;
pub use scan::{INFO_LINKS, LookupOutcome, ScanOptions, ScanReport, open_links, run_scan};

/// Installs the stderr `tracing` subscriber. `RUST_LOG` takes precedence.
pub fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("could not install logger: {e}"))?;

    Ok(())
}
