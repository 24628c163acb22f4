//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to the appropriate
//! command handlers. Passive commands (completions, list-devices, logs) run
//! before the file logger is initialized.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

use crate::commands;
use crate::logging;

/// A terminal voice recorder with remote speech-to-text transcription
#[derive(Parser)]
#[command(name = "murmur")]
#[command(version)]
#[command(about = "Record your voice and transcribe it with a remote speech-to-text service")]
#[command(
    long_about = "Record your voice from the microphone and transcribe it with a remote\nspeech-to-text service.\n\nDEFAULT COMMAND:\n    If no command is specified, 'record' is used by default.\n\nEXAMPLES:\n    # Record, transcribe, and pipe the text to another command\n    $ murmur | wc -w\n\n    # Record and write the transcription to a file\n    $ murmur -o note.txt\n\n    # Transcribe an existing audio file\n    $ murmur transcribe voice-memo.wav\n\n    # List audio input devices\n    $ murmur list-devices"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/murmur/murmur.toml\n    Logs:               ~/.local/state/murmur/murmur.log.*"
)]
struct Cli {
    /// Write transcription to file instead of stdout (record default command)
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record audio and transcribe it (default)
    ///
    /// Press Enter to stop and transcribe, Escape/q to cancel. Sending
    /// SIGUSR1 to the process also stops and transcribes.
    #[command(visible_alias = "r")]
    Record {
        /// Write transcription to file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<String>,
    },

    /// Transcribe a pre-recorded audio file
    ///
    /// Submits an existing audio file to the configured transcription
    /// service without recording.
    #[command(visible_alias = "t")]
    Transcribe {
        /// Path to the audio file to transcribe
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write transcription to file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },

    /// List available audio input devices
    ///
    /// Shows device indices, names, and configurations to help configure
    /// the input device in murmur.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "murmur", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None | Some(Commands::Record { .. }) => {
            // Default command is record; explicit record options win over
            // the global ones.
            let output = match cli.command {
                Some(Commands::Record { output }) => output.or(cli.output),
                None => cli.output,
                _ => unreachable!(),
            };
            commands::handle_record(output).await?;
        }
        Some(Commands::Transcribe { file, output }) => {
            commands::handle_transcribe(file, output.or(cli.output)).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
