use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tfmodcheck::{
    checker::{FileProcessor, Granularity, ReferenceMatcher},
    config::Config,
    model::{CheckReport, FileFailure, PatchReport},
    output::{print_check, print_patch, OutputFormat},
    registry::{load_index, FileRegistry, HttpRegistry, ModuleIndex, RegistrySource},
    scanner::FileScanner,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const FILE_FAILURE: u8 = 3;
    pub const STALE_FOUND: u8 = 4;
}

#[derive(Parser)]
#[command(name = "tfmodcheck")]
#[command(
    author,
    version,
    about = "Check Terraform files for module references behind the registry"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report module references older than the registry's latest version
    Check {
        #[command(flatten)]
        audit: AuditArgs,

        /// Exit with status 4 if any stale reference is found
        #[arg(long)]
        fail_on_stale: bool,
    },

    /// Rewrite stale module references in place
    Patch {
        #[command(flatten)]
        audit: AuditArgs,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args)]
struct AuditArgs {
    /// Files or directories to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Report selector: major, minor or all version changes
    #[arg(short = 'c', long = "report", value_name = "SELECTOR")]
    granularity: Option<Granularity>,

    /// Output format (text, json, table)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Registry base URL that module sources point at
    #[arg(long, value_name = "URL")]
    registry: Option<String>,

    /// Read the module index from a local JSON file instead of the registry
    #[arg(long, value_name = "PATH")]
    index_file: Option<PathBuf>,
}

enum Action {
    Check { fail_on_stale: bool },
    Patch,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    debug!("Debug mode is on");

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {:#}", e);
        Config::default()
    });

    match cli.command {
        Commands::Check {
            audit,
            fail_on_stale,
        } => run_audit(Action::Check { fail_on_stale }, audit, config).await,
        Commands::Patch { audit } => run_audit(Action::Patch, audit, config).await,
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tfmodcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_audit(action: Action, args: AuditArgs, mut config: Config) -> Result<u8> {
    if let Some(url) = args.registry {
        config.registry_url = url;
    }

    let granularity = args.granularity.unwrap_or(config.default_granularity);
    let format = match args.format {
        Some(format) => format,
        None => OutputFormat::from_str(&config.default_format).map_err(|e| anyhow::anyhow!(e))?,
    };
    debug!("Report selector: {}", granularity);

    let source: Box<dyn RegistrySource> = match args.index_file {
        Some(path) => Box::new(FileRegistry::new(path)),
        None => Box::new(HttpRegistry::new(config.index_url())),
    };

    let matcher = ReferenceMatcher::new(&config.base_url())?;

    // No file is looked at until the index has loaded
    let index = fetch_index(source.as_ref(), format == OutputFormat::Table).await?;

    let discovery = FileScanner::new(&config.extension)
        .with_excludes(config.exclude_dirs.clone())
        .scan(&args.paths);
    let walk_failures: Vec<FileFailure> = discovery.errors.iter().map(FileFailure::from).collect();

    let processor =
        FileProcessor::new(&index, matcher, granularity).with_ignore(config.ignore.clone());

    match action {
        Action::Check { fail_on_stale } => {
            let mut report = CheckReport::new(source.location(), granularity);
            report.failures = walk_failures;
            processor.check_files(&discovery.files, &mut report);

            print_check(&report, format)?;
            report_failures(&report.failures, format);

            if report.has_failures() {
                Ok(exit_codes::FILE_FAILURE)
            } else if fail_on_stale && !report.stale.is_empty() {
                Ok(exit_codes::STALE_FOUND)
            } else {
                Ok(exit_codes::SUCCESS)
            }
        }
        Action::Patch => {
            let mut report = PatchReport::new(source.location(), granularity);
            report.failures = walk_failures;
            processor.patch_files(&discovery.files, &mut report);

            print_patch(&report, format)?;
            report_failures(&report.failures, format);

            if report.has_failures() {
                Ok(exit_codes::FILE_FAILURE)
            } else {
                Ok(exit_codes::SUCCESS)
            }
        }
    }
}

async fn fetch_index(source: &dyn RegistrySource, is_interactive: bool) -> Result<ModuleIndex> {
    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching module index from {}...", source.location()));
        Some(pb)
    } else {
        None
    };

    let result = load_index(source).await;

    if let Some(pb) = progress {
        match &result {
            Ok(index) => pb.finish_with_message(format!("Loaded {} modules", index.len())),
            Err(_) => pb.finish_and_clear(),
        }
    }

    Ok(result?)
}

/// Table output lists failures itself; other formats keep stdout clean.
fn report_failures(failures: &[FileFailure], format: OutputFormat) {
    if format == OutputFormat::Table {
        return;
    }
    for failure in failures {
        eprintln!("Error: {}", failure.message);
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

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'tfmodcheck config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
