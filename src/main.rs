use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pkgguard::{
    cache::Cache,
    checker::{check_packages_with, AffectedIndex, MatchMode},
    config::Config,
    error::CheckError,
    loader::{is_remote, source_for},
    model::{sample_manifest, validate_shape, AffectedDataset, ManifestFragment},
    output::{format_result_to_string, print_result, OutputFormat, STDIN_LABEL},
};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const AFFECTED: u8 = 2;
}

#[derive(Parser)]
#[command(name = "pkgguard")]
#[command(
    author,
    version,
    about = "Check package.json dependencies against a list of affected packages"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a manifest against the affected packages dataset
    Check(CheckArgs),

    /// Show information about the affected packages dataset
    Dataset {
        /// Dataset path or URL (defaults to the configured dataset)
        #[arg(short, long)]
        dataset: Option<String>,

        /// Clear the dataset cache before loading
        #[arg(long)]
        clear_cache: bool,
    },

    /// Print a sample manifest
    Sample,

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Clear the cache
    ClearCache,
}

#[derive(Args)]
struct CheckArgs {
    /// Manifest file to check, or '-' to read from stdin
    #[arg(default_value = "package.json")]
    manifest: String,

    /// Dataset path or URL (defaults to the configured dataset)
    #[arg(short, long)]
    dataset: Option<String>,

    /// Output format (table, json, sarif)
    #[arg(short, long)]
    format: Option<String>,

    /// Write output to file
    #[arg(short, long)]
    output: Option<String>,

    /// Only accept a manifest holding exactly 'dependencies' and 'devDependencies'
    #[arg(long)]
    strict: bool,

    /// Match only when the declared version equals an affected version
    #[arg(long)]
    exact_versions: bool,

    /// Exit with code 2 if any affected package is found
    #[arg(long)]
    fail_on_affected: bool,

    /// Clear the dataset cache before loading
    #[arg(long)]
    clear_cache: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("warn,pkgguard=debug")
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(command: Commands) -> Result<u8> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config file: {:#}", e);
        Config::default()
    });

    match command {
        Commands::Check(args) => run_check(args, &config).await,
        Commands::Dataset {
            dataset,
            clear_cache,
        } => {
            let location = dataset.unwrap_or_else(|| config.dataset.clone());
            match load_dataset(&location, &config, clear_cache, true).await {
                Ok(data) => {
                    print_dataset_info(&location, &data);
                    Ok(exit_codes::SUCCESS)
                }
                Err(err) => Ok(refuse(&err)),
            }
        }
        Commands::Sample => {
            println!("{}", serde_json::to_string_pretty(&sample_manifest())?);
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::ClearCache => {
            let cache = Cache::new();
            cache.clear()?;
            println!("Cache cleared.");
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_check(args: CheckArgs, config: &Config) -> Result<u8> {
    let format = args
        .format
        .clone()
        .unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table;

    let (label, text) = read_manifest(&args.manifest).await?;

    if args.strict || config.strict_shape {
        if let Err(err) = validate_shape(&text) {
            return Ok(refuse(&err));
        }
    }

    let manifest = match ManifestFragment::from_json(&text) {
        Ok(manifest) => manifest,
        Err(err) => return Ok(refuse(&err)),
    };

    let location = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.dataset.clone());
    let dataset = match load_dataset(&location, config, args.clear_cache, is_interactive).await {
        Ok(dataset) => dataset,
        Err(err) => return Ok(refuse(&err)),
    };

    let mode = if args.exact_versions {
        MatchMode::Exact
    } else {
        MatchMode::Name
    };
    let index = AffectedIndex::from_dataset(&dataset);
    let report = check_packages_with(&manifest, &index, mode);

    if let Some(path) = &args.output {
        let content = format_result_to_string(&report, format, &label)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
        if is_interactive {
            println!("Results written to: {}", path);
        }
    } else {
        print_result(&report, format, &label)?;
    }

    if (args.fail_on_affected || config.fail_on_affected) && !report.is_clean() {
        return Ok(exit_codes::AFFECTED);
    }
    Ok(exit_codes::SUCCESS)
}

/// Reads manifest text, returning a display label alongside it.
async fn read_manifest(source: &str) -> Result<(String, String)> {
    if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read manifest from stdin")?;
        return Ok((STDIN_LABEL.to_string(), text));
    }

    let text = tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("Failed to read manifest {}", source))?;
    Ok((source.to_string(), text))
}

async fn load_dataset(
    location: &str,
    config: &Config,
    clear_cache: bool,
    is_interactive: bool,
) -> Result<AffectedDataset, CheckError> {
    let cache = Cache::with_ttl_hours(config.cache_ttl_hours);
    if clear_cache {
        if let Err(e) = cache.clear() {
            tracing::warn!("Failed to clear cache at {}: {:#}", cache.dir().display(), e);
        }
    }

    let progress = if is_interactive && is_remote(location) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Loading affected packages database...");
        Some(pb)
    } else {
        None
    };

    let source = source_for(location, Some(cache));
    let result = source.load().await;

    if let Some(pb) = progress {
        match &result {
            Ok(dataset) => pb.finish_with_message(format!(
                "Loaded {} affected entries",
                dataset.packages.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}

/// Reports a refused check and returns the error exit code.
fn refuse(err: &CheckError) -> u8 {
    eprintln!("{}", err.user_message());
    eprintln!("  {}", err);
    exit_codes::ERROR
}

fn print_dataset_info(location: &str, dataset: &AffectedDataset) {
    let index = AffectedIndex::from_dataset(dataset);

    println!("Dataset: {}", location);
    match dataset.crawled_at_utc() {
        Some(at) => println!("  Crawled at: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None if !dataset.crawled_at.is_empty() => println!("  Crawled at: {}", dataset.crawled_at),
        None => println!("  Crawled at: unknown"),
    }
    if !dataset.source_url.is_empty() {
        println!("  Advisory source: {}", dataset.source_url);
    }
    println!("  Entries: {}", dataset.packages.len());
    println!("  Distinct packages: {}", index.len());

    if dataset.total_packages != dataset.packages.len() as u64 {
        tracing::warn!(
            "Dataset declares {} packages but lists {}",
            dataset.total_packages,
            dataset.packages.len()
        );
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'pkgguard config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
