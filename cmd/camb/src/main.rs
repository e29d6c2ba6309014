//! CAMB.AI CLI - A command line interface for the CAMB.AI media API.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    ConfigCommand, DubCommand, LanguagesCommand, StatusCommand, TranscribeCommand,
    TranslateCommand, TranslatedTtsCommand, TtsCommand, VoicesCommand,
};

/// CAMB.AI CLI - A command line interface for the CAMB.AI media API.
///
/// Every media operation is a remote task: the request is submitted, its
/// status is polled until it finishes, and the result is fetched. Supported
/// services:
///   - End-to-end video dubbing
///   - Text-to-speech and translated text-to-speech
///   - Transcription
///   - Text translation
///   - Voice and language listings
///
/// Configuration is stored in ~/.camb/config.yaml and supports multiple
/// contexts, similar to kubectl's context management. Without a context the
/// API key is read from CAMB_API_KEY.
#[derive(Parser)]
#[command(name = "camb")]
#[command(about = "CAMB.AI API CLI tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.camb/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input request file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// List supported languages
    Languages(LanguagesCommand),
    /// Manage voices
    Voices(VoicesCommand),
    /// Dub a video end to end
    Dub(DubCommand),
    /// Synthesize speech from text
    Tts(TtsCommand),
    /// Transcribe an audio or video file
    Transcribe(TranscribeCommand),
    /// Translate texts
    Translate(TranslateCommand),
    /// Translate a text and synthesize the translation
    #[command(name = "translated-tts")]
    TranslatedTts(TranslatedTtsCommand),
    /// Show the status of a submitted task
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Languages(cmd) => cmd.run(&cli).await,
        Commands::Voices(cmd) => cmd.run(&cli).await,
        Commands::Dub(cmd) => cmd.run(&cli).await,
        Commands::Tts(cmd) => cmd.run(&cli).await,
        Commands::Transcribe(cmd) => cmd.run(&cli).await,
        Commands::Translate(cmd) => cmd.run(&cli).await,
        Commands::TranslatedTts(cmd) => cmd.run(&cli).await,
        Commands::Status(cmd) => cmd.run(&cli).await,
    }
}
