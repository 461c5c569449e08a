use anyhow::{Context, Result};
use blogroll::config::Config;
use blogroll::feed;
use blogroll::store::{FileSource, PostSource};
use chrono::Utc;
use clap::Parser;
use log::info;
use std::fs::File;
use std::path::PathBuf;

/// Regenerates the site's RSS feed from the post collection.
#[derive(Parser)]
#[command(name = "blogroll", version, about)]
struct Cli {
    /// Directory to search (upwards) for blogroll.yaml
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Write the feed somewhere other than the configured path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // The handle must stay alive for the duration of the run.
    let _logger = flexi_logger::Logger::try_with_env_or_str(&cli.log_level)?.start()?;

    let project_dir = cli
        .project
        .canonicalize()
        .with_context(|| format!("Resolving project directory `{}`", cli.project.display()))?;
    let config = Config::from_directory(&project_dir)?;

    let posts = FileSource::new(config.posts_file.clone()).fetch()?;
    info!("Loaded {} posts from `{}`", posts.len(), config.posts_file.display());

    let feed_path = cli.output.unwrap_or(config.feed_path);
    let out = File::create(&feed_path)
        .with_context(|| format!("Creating feed file `{}`", feed_path.display()))?;
    let count = feed::write_feed(&config.feed, &posts, Utc::now(), out)?;
    info!("Generated {} feed items to `{}`", count, feed_path.display());

    Ok(())
}
