//! 命令行程序入口

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use namepack::config::ConfigManager;
use namepack::core::{
    print_error_message, print_info_message, NamepackError, NamepackOptions, NamepackResult,
    ResultSet, SearchContext,
};
use namepack::env::{core::LogLevel, generate_env_docs, EnvVar};
use namepack::names::package::PREVIEW_LINES;
use namepack::names::validator::ValidationStats;
use namepack::names::{save_export, DirectorySink, NamePackage};
use namepack::network::Session;
use namepack::sites::looks_like_supported_url;

#[derive(Parser, Debug)]
#[command(
    name = "namepack",
    version,
    about = "Extract and filter shared character-name packages from Sangtacviet and Wikidich"
)]
struct Cli {
    /// Novel URL (read from standard input when omitted)
    url: Option<String>,

    /// Directory to write exported files into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export the unfiltered names instead of the filtered ones
    #[arg(short = 'O', long)]
    original: bool,

    /// Only handle package N (1-based)
    #[arg(short, long, value_name = "N")]
    package: Option<usize>,

    /// Print the rejected lines with their reasons
    #[arg(short, long)]
    rejected: bool,

    /// Do not write any file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Suppress summaries and previews
    #[arg(short, long)]
    silent: bool,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// User-Agent header
    #[arg(short, long, value_name = "UA")]
    user_agent: Option<String>,

    /// Write an example configuration file and exit
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    init_config: Option<String>,

    /// Print the supported environment variables and exit
    #[arg(long, conflicts_with = "url")]
    env_docs: bool,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        print_error_message(&format!("Error: {error}"));
        process::exit(error.exit_code());
    }
}

fn init_tracing() {
    let level = LogLevel::get_set()
        .ok()
        .flatten()
        .unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> NamepackResult<()> {
    if cli.env_docs {
        print_info_message(&generate_env_docs());
        return Ok(());
    }
    if let Some(path) = cli.init_config.as_deref() {
        ConfigManager::generate_example_config(path)?;
        print_info_message(&format!("Wrote example configuration to {path}"));
        return Ok(());
    }

    let manager = ConfigManager::with_path(cli.config.as_deref())?;
    if let Some(source) = manager.source() {
        tracing::debug!("using configuration file {}", source.display());
    }
    let config = manager.get_config();

    let mut options: NamepackOptions = config.to_options();
    options.silent = cli.silent;
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            return Err(NamepackError::ConfigError(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        options.timeout = timeout;
    }
    if let Some(user_agent) = cli.user_agent {
        options.user_agent = Some(user_agent);
    }
    let output_dir = cli.output.unwrap_or_else(|| config.output_dir());

    let url = match cli.url {
        Some(url) => url,
        None => read_url_from_stdin()?,
    };

    let session = Session::new(options.clone())?;
    let context = SearchContext::new();
    let result = context.search(&session, &url, &options)?;

    let selected = select_packages(&result, cli.package)?;

    if !options.silent {
        print_info_message(&format!(
            "{} package(s) from {} ({} valid, {} invalid)",
            result.packages().len(),
            result.site,
            result.total_valid(),
            result.total_invalid()
        ));
        if result.site.filters_lines() {
            print_stats(&result.stats());
        }
    }

    let sink = DirectorySink::new(output_dir);

    for package in selected {
        if !options.silent {
            print_summary(package);
        }
        if cli.rejected && package.invalid_count() > 0 {
            print_info_message(&package.rejection_report());
            print_info_message("");
        }
        if !cli.dry_run {
            let filename = save_export(&sink, package, cli.original)?;
            if !options.silent {
                print_info_message(&format!("Saved {}", sink.path_for(&filename).display()));
            }
        }
    }

    Ok(())
}

fn read_url_from_stdin() -> NamepackResult<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let url = input.trim().to_string();

    if url.is_empty() {
        return Err(NamepackError::MalformedUrl(
            "no URL given on the command line or standard input".to_string(),
        ));
    }
    if !looks_like_supported_url(&url) {
        tracing::warn!("input does not look like a supported novel URL: {}", url);
    }

    Ok(url)
}

fn select_packages(result: &ResultSet, number: Option<usize>) -> NamepackResult<Vec<&NamePackage>> {
    match number {
        None => Ok(result.packages().iter().collect()),
        Some(0) => Err(NamepackError::PackageNotFound(0)),
        Some(n) => result
            .package(n - 1)
            .map(|package| vec![package])
            .map_err(|_| NamepackError::PackageNotFound(n)),
    }
}

fn print_summary(package: &NamePackage) {
    let mut header = format!("\n== {} ==  {} valid", package.title(), package.valid_count());
    if package.site().filters_lines() {
        header.push_str(&format!(", {} invalid", package.invalid_count()));
    }
    print_info_message(&header);

    let preview = package.preview(PREVIEW_LINES);
    for line in &preview.lines {
        print_info_message(&format!("  {line}"));
    }
    if preview.has_more {
        print_info_message(&format!("  ... ({} more)", preview.total - preview.lines.len()));
    }
    if package.offers_original() {
        print_info_message("  (use --original to export the unfiltered names)");
    }
}

fn print_stats(stats: &ValidationStats) {
    print_info_message(&format!(
        "Acceptance rate: {:.1}%",
        stats.acceptance_rate() * 100.0
    ));
    for (kind, count) in stats.reason_counts() {
        print_info_message(&format!("  {:<26} {count}", kind.as_str()));
    }
}
