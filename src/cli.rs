//! Command-line interface for whispermon
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Live whisper/voice-presence monitor for microphone arrays
#[derive(Parser, Debug)]
#[command(
    name = "whispermon",
    version,
    about = "Live whisper/voice-presence monitor for microphone arrays"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the key-value store (profile + alert history)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Suppress the status line (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: alert lifecycle, -vv: every snapshot)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Stop after this long (default: run until Ctrl+C). Examples: 30s, 5m, 1h30m
    #[arg(long, value_name = "DURATION", value_parser = parse_run_duration)]
    pub duration: Option<Duration>,
}

/// Parse a run duration string.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`).
fn parse_run_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded JSONL snapshot session
    Replay {
        /// Path to the session file (one snapshot or `null` per line)
        file: PathBuf,

        /// Interval between replayed updates. Examples: 100ms, 1s
        #[arg(long, value_name = "DURATION", value_parser = parse_replay_interval)]
        interval: Option<Duration>,
    },

    /// Inspect or clear the recorded alert history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show or update the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn parse_replay_interval(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List recent alerts, newest first
    Show {
        /// Maximum number of alerts to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Delete all recorded alerts
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Print the stored profile
    Show,
    /// Update profile fields
    Set {
        /// Display name shown in the monitor header
        #[arg(long)]
        name: Option<String>,

        /// Label of the monitored room
        #[arg(long)]
        room: Option<String>,

        /// Play an audible tone on raised alerts
        #[arg(long)]
        sound: Option<bool>,

        /// Raise system notifications on raised alerts
        #[arg(long)]
        notifications: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_without_arguments() {
        let cli = Cli::parse_from(["whispermon"]);
        assert!(cli.command.is_none());
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.duration.is_none());
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["whispermon", "-q", "-vv", "--duration", "30s"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.duration, Some(Duration::from_secs(30)));
    }

    #[test]
    fn duration_accepts_bare_seconds_and_compound() {
        assert_eq!(parse_run_duration("45"), Ok(Duration::from_secs(45)));
        assert_eq!(parse_run_duration("1h30m"), Ok(Duration::from_secs(5400)));
        assert!(parse_run_duration("soon").is_err());
    }

    #[test]
    fn cli_parses_replay_command() {
        let cli = Cli::parse_from([
            "whispermon",
            "replay",
            "session.jsonl",
            "--interval",
            "50ms",
        ]);
        match cli.command {
            Some(Commands::Replay { file, interval }) => {
                assert_eq!(file, PathBuf::from("session.jsonl"));
                assert_eq!(interval, Some(Duration::from_millis(50)));
            }
            other => panic!("Expected replay command, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_history_show_with_limit() {
        let cli = Cli::parse_from(["whispermon", "history", "show", "--limit", "5"]);
        match cli.command {
            Some(Commands::History {
                action: HistoryAction::Show { limit },
            }) => assert_eq!(limit, 5),
            other => panic!("Expected history show, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_profile_set() {
        let cli = Cli::parse_from([
            "whispermon",
            "profile",
            "set",
            "--name",
            "Ms. Rivera",
            "--sound",
            "false",
        ]);
        match cli.command {
            Some(Commands::Profile {
                action:
                    ProfileAction::Set {
                        name,
                        room,
                        sound,
                        notifications,
                    },
            }) => {
                assert_eq!(name.as_deref(), Some("Ms. Rivera"));
                assert_eq!(room, None);
                assert_eq!(sound, Some(false));
                assert_eq!(notifications, None);
            }
            other => panic!("Expected profile set, got {:?}", other),
        }
    }

    #[test]
    fn cli_verify_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
