use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fanfetch::manager::Options;
use fanfetch::prelude::{ConsoleReporter, Coordinator};

#[derive(Parser)]
#[command(name = "fanfetch")]
#[command(about = "Download a list of URLs concurrently", version)]
struct Args {
    /// List of links divided by space or newline characters
    #[arg(short = 'l', long = "links", default_value = "")]
    links: String,
    /// Output directory
    #[arg(short = 'o', long = "out-dir", default_value = ".")]
    out_dir: PathBuf,
    /// Maximum number of downloads running at once
    #[arg(short = 'c', long, default_value_t = 4)]
    concurrency: usize,
    /// Per-download timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so the download report stream stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = Options {
        out_dir: args.out_dir,
        max_concurrent: args.concurrency.max(1),
        task_timeout: Duration::from_secs(args.timeout),
    };

    let coordinator = Coordinator::new(options, Arc::new(ConsoleReporter::new()));
    if let Err(err) = coordinator.run(&args.links).await {
        eprintln!("{err}");
        process::exit(1);
    }
    Ok(())
}
