//! Page-Harvest main entry point
//!
//! This is the command-line interface for the Page-Harvest website harvester.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use page_harvest::config::{load_config, ScraperConfig};
use page_harvest::output::{format_markdown_report, format_summary};
use page_harvest::{ScrapeReport, Scraper};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page-Harvest: a bounded, single-origin website harvester
///
/// Page-Harvest discovers pages on one website through its sitemap and links,
/// respects robots.txt, skips login, error and boilerplate pages, and extracts
/// clean text ready for indexing.
#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(version)]
#[command(about = "A bounded, single-origin website harvester", long_about = None)]
struct Cli {
    /// Seed URL; the crawl never leaves its origin
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to return (overrides the config file)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Pages fetched concurrently per batch (overrides the config file)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Render pages through a headless browser
    #[arg(long)]
    render: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate the configuration and show it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary and page list
    Text,
    /// The full report as JSON
    Json,
    /// One markdown section per page
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&cli.url, &config);
        return Ok(());
    }

    let scraper = Scraper::new(config).context("Invalid configuration")?;
    let report = match scraper.scrape(&cli.url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let rendered = render_report(&report, cli.format)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_harvest=info,warn"),
            1 => EnvFilter::new("page_harvest=debug,info"),
            2 => EnvFilter::new("page_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so report output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<ScraperConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => ScraperConfig::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if cli.render {
        config.render_javascript = true;
    }

    page_harvest::config::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(url: &str, config: &ScraperConfig) {
    println!("=== Page-Harvest Dry Run ===\n");

    println!("Seed URL: {}\n", url);

    println!("Limits:");
    println!("  Max pages: {}", config.max_pages);
    println!("  Concurrency: {}", config.concurrency);
    println!("  Timeout: {}ms", config.timeout_ms);
    println!("  Batch delay: {}ms", config.batch_delay_ms);
    println!("  Max redirects: {}", config.max_redirects);
    println!("  Min content length: {} chars", config.min_content_length);

    println!("\nFilters:");
    println!("  Login pages: {}", config.filter_login_pages);
    println!("  Error pages: {}", config.filter_error_pages);
    println!("  Custom patterns ({}):", config.custom_filter_patterns.len());
    for pattern in &config.custom_filter_patterns {
        println!("    - {}", pattern);
    }

    println!("\nRendering:");
    println!("  JavaScript: {}", config.render_javascript);
    if config.render_javascript {
        println!("  Browser memory limit: {} MB", config.browser_memory_limit_mb);
    }

    println!("\nUser Agent: {}", config.user_agent);
    println!("\n✓ Configuration is valid");
}

fn render_report(report: &ScrapeReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => format_summary(report),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            json.push('\n');
            json
        }
        OutputFormat::Markdown => format_markdown_report(report),
    })
}
