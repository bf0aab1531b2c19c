//! Blog CLI - publishes the site described in `site.rs`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blog_publish::{Pipeline, ProjectLayout, PublishContext};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod site;

#[derive(Parser)]
#[command(name = "blog")]
#[command(about = "Publish the blog from markdown content")]
#[command(version)]
pub struct Cli {
    /// Project root containing content/ and resources/
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Skip stylesheet minification
    #[arg(long)]
    no_minify: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let site = site::descriptor().context("Invalid site configuration")?;
    let ctx = PublishContext::new(site, ProjectLayout::at(&cli.root)).with_minify(!cli.no_minify);

    tracing::info!("Publishing {} from {}", ctx.site().name(), cli.root.display());

    Pipeline::new(site::pipeline())
        .run(&ctx)
        .context("Publishing failed")?;

    Ok(())
}
