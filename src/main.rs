// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod extraction;
mod file_utils;
mod language_utils;
mod media_probe;
mod providers;
mod subtitle_document;
mod translation_service;

/// CLI wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    LibreTranslate,
    GoogleWeb,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::LibreTranslate => TranslationProvider::LibreTranslate,
            CliTranslationProvider::GoogleWeb => TranslationProvider::GoogleWeb,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for ondertitel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ondertitel - Dutch subtitle acquisition for video files
///
/// Probes video containers for an embedded Dutch subtitle track; when none
/// exists, extracts an English (or first-available) track and machine
/// translates it, writing the result next to the video file.
#[derive(Parser, Debug)]
#[command(name = "ondertitel")]
#[command(version = "0.3.0")]
#[command(about = "Dutch subtitle acquisition for video files")]
#[command(long_about = "ondertitel scans for video files, prefers embedded Dutch subtitle tracks \
and falls back to extracting and machine-translating an English track.

EXAMPLES:
    ondertitel /media/movies                   # Scan a directory
    ondertitel /media/movies /media/series     # Scan several directories
    ondertitel --single movie.mkv              # Process a single file
    ondertitel --hours 24 /media/movies        # Only files modified in the last day
    ondertitel --force /media/movies           # Reprocess existing .nl.srt files
    ondertitel --no-clean /media/movies        # Keep hearing-impaired annotations
    ondertitel completions bash                # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED BACKENDS:
    libre-translate - Self-hosted LibreTranslate server (default: http://localhost:5000)
    google-web      - Public Google translate web endpoint")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directories to scan for video files
    #[arg(value_name = "DIRECTORIES")]
    directories: Vec<PathBuf>,

    /// Process a single file instead of scanning directories
    #[arg(long)]
    single: Option<PathBuf>,

    /// Only process files modified within the last N hours (0 for all files)
    #[arg(long)]
    hours: Option<u64>,

    /// Process all files regardless of modification time
    #[arg(long)]
    all: bool,

    /// Working directory for extraction artifacts (kept after the run)
    #[arg(long)]
    temp: Option<PathBuf>,

    /// Process files even if a target-language subtitle file already exists
    #[arg(short, long)]
    force: bool,

    /// Do not remove hearing-impaired text (sound cues, speaker labels)
    #[arg(long = "no-clean", action = clap::ArgAction::SetFalse)]
    clean: bool,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Endpoint URL for the translation backend
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Target language code (e.g. 'nl')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ondertitel", &mut std::io::stdout());
        return Ok(());
    }

    run_acquire(cli).await
}

async fn run_acquire(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_config(&options)?;

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let media_files = collect_media_files(&options)?;
    if media_files.is_empty() {
        let mut message = "No media files found".to_string();
        if let Some(hours) = options.hours.filter(|h| *h > 0) {
            message.push_str(&format!(" modified in the last {} hours", hours));
        }
        info!("{} in the selected directories.", message);
        if options.hours.is_some_and(|h| h > 0) {
            info!("Tip: use --all to process files regardless of modification time");
        }
        return Ok(());
    }

    info!("Found {} media file(s).", media_files.len());

    let controller = Controller::with_config(config)?.with_working_dir(options.temp.clone());
    controller.run_batch(&media_files, options.force).await?;

    Ok(())
}

/// Load the configuration file, creating a default one when missing, and
/// apply command line overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(endpoint) = &options.endpoint {
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.endpoint = endpoint.clone();
        }
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.clean_hearing_impaired = options.clean && config.clean_hearing_impaired;

    Ok(config)
}

/// Resolve the list of media files from the CLI inputs.
///
/// An invalid single file or an empty set of valid directories is fatal and
/// reported before any file processing starts.
fn collect_media_files(options: &CommandLineOptions) -> Result<Vec<PathBuf>> {
    if let Some(single) = &options.single {
        if !single.is_file() {
            return Err(anyhow!("File does not exist: {:?}", single));
        }
        return Ok(vec![single.clone()]);
    }

    if options.directories.is_empty() {
        return Err(anyhow!("No directories specified. Pass one or more directories, or use --single FILE."));
    }

    let mut valid_directories = Vec::new();
    for directory in &options.directories {
        if directory.is_dir() {
            valid_directories.push(directory.clone());
        } else {
            warn!("Directory {:?} does not exist and will be skipped.", directory);
        }
    }

    if valid_directories.is_empty() {
        return Err(anyhow!("No valid directories specified."));
    }

    let hours = if options.all { None } else { options.hours };
    let time_message = match hours {
        Some(h) if h > 0 => format!("files modified in the last {} hours", h),
        _ => "all files".to_string(),
    };
    info!(
        "Scanning for media files ({}) in {} directories...",
        time_message,
        valid_directories.len()
    );

    file_utils::FileManager::find_media_files(&valid_directories, hours)
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
