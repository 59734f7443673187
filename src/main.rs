use anyhow::{Result, bail};
use clap::Parser;
use meta_scan::display::{failure, info, show_banner};
use meta_scan::{
    ClientConfig, Credentials, INFO_LINKS, RapidApiClient, ScanOptions, open_links, run_scan,
    save_json, setup_logging,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Facebook profile/page/posts lookup via RapidAPI",
    long_about = None
)]
struct Cli {
    /// Facebook username or permalink (e.g. nasa)
    #[arg(short, long)]
    username: Option<String>,

    /// Do not query page details (premium endpoint)
    #[arg(long)]
    no_page: bool,

    /// Do not query posts (premium endpoint)
    #[arg(long)]
    no_posts: bool,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
    connect_timeout: u64,

    /// Read timeout in seconds
    #[arg(long, default_value_t = 45, value_parser = clap::value_parser!(u64).range(1..))]
    read_timeout: u64,

    /// Directory to save the combined output as JSON (e.g. ./out)
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Do not open the informational links after the run
    #[arg(long)]
    no_open: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn prompt_username() -> Result<String> {
    print!("\n[*] Enter the username: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    show_banner();
    setup_logging(cli.verbose)?;

    let credentials = Credentials::from_env()?;

    let username = match cli.username {
        Some(username) => username.trim().to_string(),
        None => prompt_username()?,
    };
    if username.is_empty() {
        bail!("Empty username. Exiting.");
    }

    let client = RapidApiClient::new(ClientConfig::with_timeouts(
        cli.connect_timeout,
        cli.read_timeout,
    ))?;

    let options = ScanOptions {
        skip_page: cli.no_page,
        skip_posts: cli.no_posts,
    };
    let report = run_scan(&client, &credentials, &username, options).await;

    if let Some(out_dir) = &cli.out_json {
        match save_json(
            out_dir,
            &username,
            report.profile.found(),
            report.page.found(),
            report.posts.found(),
        ) {
            Ok(path) => info(format!("[✔] Saved JSON: {}", path.display())),
            Err(e) => failure(format!("[!] {e}")),
        }
    }

    if !cli.no_open {
        open_links(&INFO_LINKS);
    }

    Ok(())
}
