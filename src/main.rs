// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{Read, Write};
use std::path::PathBuf;
use url::Url;

use subtrans::app_config::{Config, LogLevel};
use subtrans::app_controller::Controller;
use subtrans::captions::CaptionFormat;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a subtitle URL, a local caption file or a folder of caption files
    Translate(TranslateArgs),

    /// Translate free texts given as arguments (or one per line on stdin)
    Texts {
        /// Texts to translate
        #[arg(value_name = "TEXT")]
        texts: Vec<String>,

        /// Target language code (default from config)
        #[arg(short, long)]
        target_language: Option<String>,

        /// Source language code, or 'auto'
        #[arg(short, long)]
        source_language: Option<String>,
    },

    /// List stored translations, newest first
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: i64,

        /// Page size (1-100)
        #[arg(long, default_value_t = 20)]
        limit: i64,

        /// Only show translations into this language
        #[arg(long)]
        target: Option<String>,
    },

    /// Print a stored translation
    Show {
        /// Stored translation id
        id: i64,
    },

    /// Replace the content of a stored translation with a file
    Update {
        /// Stored translation id
        id: i64,

        /// File holding the new WebVTT content
        file: PathBuf,
    },

    /// Delete a stored translation
    Delete {
        /// Stored translation id
        id: i64,
    },

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Subtitle URL, caption file or directory
    #[arg(value_name = "INPUT")]
    input: String,

    /// Caption format (vtt, srt, ass); guessed from the extension when omitted
    #[arg(long)]
    format: Option<String>,

    /// Target language code (default from config)
    #[arg(short, long)]
    target_language: Option<String>,

    /// Source language code, or 'auto'
    #[arg(short, long)]
    source_language: Option<String>,

    /// Referer header sent with remote downloads
    #[arg(long)]
    referer: Option<String>,

    /// Output file (local files only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// subtrans - subtitle translation with cached results
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version)]
#[command(about = "Translate WebVTT and ASS subtitles into WebVTT")]
#[command(long_about = "subtrans translates WebVTT/SRT and ASS/SSA subtitles through a web translation backend and writes WebVTT.

EXAMPLES:
    subtrans translate https://example.com/ep1.vtt      # Translate and store a remote subtitle
    subtrans translate -t en movie.ass                 # Translate a local file into English
    subtrans translate -f /videos/                     # Translate every caption file in a folder
    subtrans texts 'Good morning' 'See you'            # Translate free texts
    subtrans list --page 2 --limit 10                  # Browse stored translations
    subtrans completions bash > subtrans.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logger starts at trace so later set_max_level calls can raise or lower it
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subtrans", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Translate(args) => run_translate(&controller, args).await,
        Commands::Texts {
            texts,
            target_language,
            source_language,
        } => {
            let texts = if texts.is_empty() {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .context("Failed to read texts from stdin")?;
                input.lines().map(str::to_string).collect()
            } else {
                texts
            };

            let translated = controller
                .translate_texts(&texts, target_language.as_deref(), source_language.as_deref())
                .await?;
            for line in translated {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::List { page, limit, target } => {
            let page = controller.list_subtitles(page, limit, target.as_deref()).await?;
            for item in &page.items {
                println!(
                    "{:>5}  {:<4} {:<4} {:>8}  {}  {}",
                    item.id, item.target_lang, item.format, item.file_size, item.created_at, item.url
                );
            }
            println!(
                "page {}/{} ({} total)",
                page.page,
                page.total_pages.max(1),
                page.total
            );
            Ok(())
        }
        Commands::Show { id } => {
            let subtitle = controller.get_subtitle(id).await?;
            print!("{}", subtitle.content);
            Ok(())
        }
        Commands::Update { id, file } => {
            let content = subtrans::file_utils::FileManager::read_to_string(&file)?;
            controller.update_subtitle(id, &content).await?;
            Ok(())
        }
        Commands::Delete { id } => controller.delete_subtitle(id).await,
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_translate(controller: &Controller, args: TranslateArgs) -> Result<()> {
    let format = args
        .format
        .as_deref()
        .map(str::parse::<CaptionFormat>)
        .transpose()?;
    let target = args.target_language.as_deref();
    let source = args.source_language.as_deref();

    if args.input.starts_with("http://") || args.input.starts_with("https://") {
        let format = format
            .or_else(|| {
                Url::parse(&args.input)
                    .ok()
                    .and_then(|url| CaptionFormat::from_path(url.path()))
            })
            .unwrap_or_default();
        let subtitle = controller
            .translate_subtitle(
                &args.input,
                format,
                target,
                source,
                args.referer.as_deref(),
            )
            .await?;

        match args.output {
            Some(output) => {
                subtrans::file_utils::FileManager::write_to_file(&output, &subtitle.content)?;
                info!("Wrote {:?}", output);
            }
            None => print!("{}", subtitle.content),
        }
        return Ok(());
    }

    let input_path = PathBuf::from(&args.input);
    if input_path.is_file() {
        controller
            .translate_file(&input_path, format, target, source, args.output, args.force_overwrite)
            .await?;
    } else if input_path.is_dir() {
        controller
            .translate_folder(&input_path, target, source, args.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
