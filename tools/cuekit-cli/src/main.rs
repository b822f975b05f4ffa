//! Cuekit CLI: command-line tooling for subtitle files.
//!
//! Usage:
//!   cuekit validate <FILE>               Report timing errors and warnings
//!   cuekit convert <FILE> --to <FORMAT>  Convert between SRT, WebVTT and ASS
//!   cuekit sync <FILE> --offset <S>      Shift or stretch all cues
//!   cuekit info <FILE>                   Show cue count and timing range
//!   cuekit embed <VIDEO> <SUBS> -o <OUT> Put subtitle files into a video

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "cuekit",
    about = "Subtitle timing, validation and conversion",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/cuekit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a subtitle file
    Validate {
        /// SRT or WebVTT file
        file: PathBuf,
    },

    /// Convert a subtitle file to another format
    Convert {
        /// SRT or WebVTT file
        file: PathBuf,

        /// Target format: srt|vtt|ass
        #[arg(long)]
        to: String,

        /// Output file (defaults to the input with the new extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep bold/italic tags in SRT output
        #[arg(long)]
        formatting: bool,
    },

    /// Re-synchronize every cue: new = old * speed + offset
    Sync {
        /// SRT or WebVTT file
        file: PathBuf,

        /// Offset in seconds (may be negative)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: f64,

        /// Speed factor
        #[arg(long, default_value = "1")]
        speed: f64,

        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show subtitle file information
    Info {
        /// SRT or WebVTT file
        file: PathBuf,
    },

    /// Embed a subtitle file into a video with ffmpeg
    Embed {
        /// Source video
        video: PathBuf,

        /// SRT or WebVTT file
        subtitles: PathBuf,

        /// Output video
        #[arg(short, long)]
        output: PathBuf,

        /// Draw the text into the frames instead of adding a stream
        #[arg(long)]
        burn_in: bool,

        /// Stream language tag
        #[arg(long, default_value = "und")]
        language: String,

        /// Stream title (defaults to the subtitle file name)
        #[arg(long)]
        label: Option<String>,

        /// Additional soft subtitle stream as LANG=FILE (repeatable)
        #[arg(long, value_name = "LANG=FILE")]
        extra: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(cuekit_common::config::config_file_path);
    let mut config = config::CliConfig::load(&config_path);
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    cuekit_common::logging::init_logging(&config.logging);
    tracing::debug!(path = %config_path.display(), "Configuration loaded");

    let engine_config = config.engine;
    match cli.command {
        Commands::Validate { file } => commands::validate::run(engine_config, file).await,
        Commands::Convert {
            file,
            to,
            output,
            formatting,
        } => commands::convert::run(engine_config, file, to, output, formatting).await,
        Commands::Sync {
            file,
            offset,
            speed,
            output,
        } => commands::sync::run(engine_config, file, offset, speed, output).await,
        Commands::Info { file } => commands::info::run(engine_config, file).await,
        Commands::Embed {
            video,
            subtitles,
            output,
            burn_in,
            language,
            label,
            extra,
        } => {
            commands::embed::run(
                engine_config,
                video,
                subtitles,
                output,
                burn_in,
                language,
                label,
                extra,
            )
            .await
        }
    }
}
