use anyhow::Result;
use clap::Parser;
use whispermon::cli::{Cli, Commands, ConfigAction, HistoryAction, ProfileAction};
use whispermon::config::Config;
use whispermon::signal::snapshot::format_time_label;
use whispermon::store::{EventLog, FileStore, KeyValueStore, ProfileSettings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        None => {
            whispermon::app::run_simulate(config, cli.store, cli.duration, cli.quiet, cli.verbose)
                .await?;
        }
        Some(Commands::Replay { file, interval }) => {
            whispermon::app::run_replay(
                config,
                file,
                interval,
                cli.store,
                cli.duration,
                cli.quiet,
                cli.verbose,
            )
            .await?;
        }
        Some(Commands::History { action }) => {
            handle_history_command(action, cli.store)?;
        }
        Some(Commands::Profile { action }) => {
            handle_profile_command(action, cli.store)?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref(), &config);
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path()),
    };
    Ok(config.with_env_overrides())
}

fn open_store(store_path: Option<std::path::PathBuf>) -> FileStore {
    FileStore::new(whispermon::app::resolve_store_path(store_path))
}

fn handle_history_command(
    action: HistoryAction,
    store_path: Option<std::path::PathBuf>,
) -> Result<()> {
    let log = EventLog::new(open_store(store_path));
    match action {
        HistoryAction::Show { limit } => {
            let records = log.recent(limit)?;
            if records.is_empty() {
                println!("no recorded alerts");
                return Ok(());
            }
            for record in records {
                println!(
                    "{}  #{:<5} voice at {:03}\u{00b0}",
                    format_time_label(record.timestamp),
                    record.id,
                    record.doa
                );
            }
        }
        HistoryAction::Clear => {
            log.clear()?;
            println!("alert history cleared");
        }
    }
    Ok(())
}

fn handle_profile_command(
    action: ProfileAction,
    store_path: Option<std::path::PathBuf>,
) -> Result<()> {
    let store = open_store(store_path);
    match action {
        ProfileAction::Show => {
            let profile = ProfileSettings::load(&store as &dyn KeyValueStore)?;
            println!("name:          {}", display_or_unset(&profile.display_name));
            println!("room:          {}", display_or_unset(&profile.room));
            println!("sound:         {}", profile.sound_enabled);
            println!("notifications: {}", profile.notifications_enabled);
        }
        ProfileAction::Set {
            name,
            room,
            sound,
            notifications,
        } => {
            let mut profile = ProfileSettings::load(&store as &dyn KeyValueStore)?;
            if let Some(name) = name {
                profile.display_name = name;
            }
            if let Some(room) = room {
                profile.room = room;
            }
            if let Some(sound) = sound {
                profile.sound_enabled = sound;
            }
            if let Some(notifications) = notifications {
                profile.notifications_enabled = notifications;
            }
            profile.save(&store as &dyn KeyValueStore)?;
            println!("profile updated");
        }
    }
    Ok(())
}

fn handle_config_command(action: ConfigAction, path: Option<&std::path::Path>, config: &Config) {
    match action {
        ConfigAction::Path => {
            let path = path
                .map(|p| p.to_path_buf())
                .unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
        ConfigAction::Show => match toml::to_string_pretty(config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => eprintln!("whispermon: failed to render config: {e}"),
        },
    }
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "(unset)" } else { value }
}
