//! Composition root: wires config, stores, sinks, and sources into a
//! running monitor session.

use crate::alert::announcer::{Announcer, DesktopAnnouncer, NullAnnouncer};
use crate::config::Config;
use crate::monitor::event::MonitorEvent;
use crate::monitor::runtime::{Monitor, MonitorHandle};
use crate::output::{TerminalSink, clear_line, render_event};
use crate::source::{ReplaySource, SimulateConfig, SimulatedSource, SnapshotSource};
use crate::store::{EventLog, FileStore, ProfileSettings};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Runs the monitor against the scripted simulator.
pub async fn run_simulate(
    config: Config,
    store_path: Option<PathBuf>,
    duration: Option<Duration>,
    quiet: bool,
    verbosity: u8,
) -> anyhow::Result<()> {
    let source = SimulatedSource::with_config(SimulateConfig {
        interval_ms: config.simulate.interval_ms,
        ..Default::default()
    });
    run_monitor(config, Box::new(source), store_path, duration, quiet, verbosity).await
}

/// Runs the monitor against a recorded JSONL session.
pub async fn run_replay(
    config: Config,
    file: PathBuf,
    interval: Option<Duration>,
    store_path: Option<PathBuf>,
    duration: Option<Duration>,
    quiet: bool,
    verbosity: u8,
) -> anyhow::Result<()> {
    let mut source = ReplaySource::new(file);
    if let Some(interval) = interval {
        source = source.with_interval(interval);
    }
    run_monitor(config, Box::new(source), store_path, duration, quiet, verbosity).await
}

/// Resolves the key-value store path.
pub fn resolve_store_path(store_path: Option<PathBuf>) -> PathBuf {
    store_path.unwrap_or_else(Config::default_store_path)
}

async fn run_monitor(
    config: Config,
    source: Box<dyn SnapshotSource>,
    store_path: Option<PathBuf>,
    duration: Option<Duration>,
    quiet: bool,
    verbosity: u8,
) -> anyhow::Result<()> {
    config.validate()?;

    let store = Arc::new(FileStore::new(resolve_store_path(store_path)));
    let profile = ProfileSettings::load(store.as_ref())?;

    if !quiet && !profile.display_name.is_empty() {
        let room = if profile.room.is_empty() {
            String::new()
        } else {
            format!(" — {}", profile.room)
        };
        eprintln!("whispermon: monitoring for {}{}", profile.display_name, room);
    }

    let announcer = build_announcer(&config, &profile);

    let (event_tx, event_rx) = crossbeam_channel::bounded(256);
    let mut monitor_config = config.monitor_config();
    monitor_config.event_tx = Some(event_tx);

    // Renders alert lifecycle lines; drains until the Stopped marker.
    let render_quiet = quiet;
    let render_thread = std::thread::spawn(move || {
        for event in event_rx.iter() {
            let stopped = matches!(event, MonitorEvent::Stopped);
            if !render_quiet {
                render_event(&event, verbosity);
            }
            if stopped {
                break;
            }
        }
    });

    let sink = TerminalSink::new(quiet);
    let handle = Monitor::new(monitor_config)
        .with_event_log(Box::new(EventLog::new(store.clone())))
        .start(source, Box::new(sink.clone()), Box::new(sink), announcer)?;

    wait_for_session_end(&handle, duration).await;

    let total = handle.stop().await;
    if render_thread.join().is_err() {
        eprintln!("whispermon: event render thread panicked");
    }

    if !quiet {
        clear_line();
        eprintln!("whispermon: session ended — voiced samples: {total}");
    }
    Ok(())
}

fn build_announcer(config: &Config, profile: &ProfileSettings) -> Arc<dyn Announcer> {
    let sound = config.alerts.sound_enabled && profile.sound_enabled;
    let notifications = config.alerts.notifications_enabled || profile.notifications_enabled;

    if !sound && !notifications {
        return Arc::new(NullAnnouncer);
    }

    let mut announcer = DesktopAnnouncer::system(notifications);
    if !sound {
        // An empty tone command keeps the notification channel without audio.
        announcer = announcer.with_tone_command(Vec::new());
    } else if !config.alerts.tone_command.is_empty() {
        announcer = announcer.with_tone_command(config.alerts.tone_command.clone());
    }
    Arc::new(announcer)
}

/// Waits for Ctrl+C, the optional duration, or the source ending on its own.
async fn wait_for_session_end(handle: &MonitorHandle, duration: Option<Duration>) {
    let deadline = duration.map(|d| tokio::time::Instant::now() + d);

    loop {
        if !handle.is_running() {
            return;
        }
        if let Some(deadline) = deadline
            && tokio::time::Instant::now() >= deadline
        {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
            result = tokio::signal::ctrl_c() => {
                result.ok();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_announcer_when_everything_disabled() {
        let mut config = Config::default();
        config.alerts.sound_enabled = false;
        config.alerts.notifications_enabled = false;
        let profile = ProfileSettings {
            sound_enabled: false,
            notifications_enabled: false,
            ..Default::default()
        };

        let announcer = build_announcer(&config, &profile);
        assert!(!announcer.has_permission());
    }

    #[test]
    fn desktop_announcer_gets_permission_from_profile() {
        let config = Config::default();
        let profile = ProfileSettings {
            notifications_enabled: true,
            ..Default::default()
        };

        let announcer = build_announcer(&config, &profile);
        assert!(announcer.has_permission());
    }

    #[test]
    fn config_sound_off_vetoes_profile_sound() {
        let mut config = Config::default();
        config.alerts.sound_enabled = false;
        config.alerts.notifications_enabled = true;
        let profile = ProfileSettings::default();

        // Still a desktop announcer (notifications on), permission granted.
        let announcer = build_announcer(&config, &profile);
        assert!(announcer.has_permission());
    }

    #[test]
    fn resolve_store_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/custom-store.json");
        assert_eq!(resolve_store_path(Some(explicit.clone())), explicit);
    }

    #[tokio::test]
    async fn replay_session_runs_to_completion() {
        use std::io::Write;
        let dir = tempfile::TempDir::new().unwrap();
        let session = dir.path().join("session.jsonl");
        let mut file = std::fs::File::create(&session).unwrap();
        writeln!(file, "{{\"doa\":10,\"is_voice\":true,\"timestamp\":1000}}").unwrap();
        writeln!(file, "{{\"doa\":10,\"is_voice\":false,\"timestamp\":1100}}").unwrap();
        drop(file);

        let store = dir.path().join("store.json");
        // Silence the announcer so the test never shells out to a tone player.
        ProfileSettings {
            sound_enabled: false,
            ..Default::default()
        }
        .save(&FileStore::new(&store))
        .unwrap();

        run_replay(
            Config::default(),
            session,
            Some(Duration::from_millis(1)),
            Some(store.clone()),
            Some(Duration::from_secs(5)),
            true,
            0,
        )
        .await
        .unwrap();

        // The raised alert landed in the history store.
        let log = EventLog::new(FileStore::new(store));
        assert_eq!(log.recent(10).unwrap().len(), 1);
    }
}
