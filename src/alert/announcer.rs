//! Audible and desktop-notification side effects for raised alerts.
//!
//! The announcer is a capability the processor may invoke and whose
//! outcome it is defined to ignore: both channels are fire-and-forget,
//! failures are swallowed, and nothing is retried. A missing tool or a
//! denied notification permission costs a cue, never queue correctness.

use crate::error::{MonitorError, Result};
use std::sync::{Arc, Mutex};

/// Default tone player invocation (freedesktop bell sample).
pub const DEFAULT_TONE_COMMAND: &[&str] = &[
    "paplay",
    "/usr/share/sounds/freedesktop/stereo/bell.oga",
];

/// Side-effect capability invoked when an alert is raised.
pub trait Announcer: Send + Sync {
    /// Plays a short audible tone.
    fn play_tone(&self) -> Result<()>;

    /// Raises a system-level notification summarizing the DOA.
    fn notify(&self, doa: u16) -> Result<()>;

    /// Returns true if the host environment has granted notification
    /// permission. When false, `notify` is not invoked at all.
    fn has_permission(&self) -> bool;
}

/// Trait for running external commands, allowing mocks in tests.
pub trait CommandExecutor: Send + Sync {
    /// Executes a command and discards its output.
    fn execute(&self, command: &str, args: &[&str]) -> Result<()>;
}

/// Executes commands via `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<()> {
        let status = std::process::Command::new(command)
            .args(args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map_err(|e| MonitorError::Announce {
                message: format!("{command}: {e}"),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(MonitorError::Announce {
                message: format!("{command} exited with {status}"),
            })
        }
    }
}

/// Announcer that does nothing. Default for library use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn play_tone(&self) -> Result<()> {
        Ok(())
    }

    fn notify(&self, _doa: u16) -> Result<()> {
        Ok(())
    }

    fn has_permission(&self) -> bool {
        false
    }
}

/// Announcer backed by desktop tooling: a tone player and `notify-send`.
pub struct DesktopAnnouncer<E: CommandExecutor> {
    executor: E,
    tone_command: Vec<String>,
    notifications_enabled: bool,
}

impl DesktopAnnouncer<SystemCommandExecutor> {
    /// Creates a desktop announcer using the system command executor.
    pub fn system(notifications_enabled: bool) -> Self {
        Self::new(SystemCommandExecutor, notifications_enabled)
    }
}

impl<E: CommandExecutor> DesktopAnnouncer<E> {
    /// Creates a desktop announcer with a custom executor (testing use).
    pub fn new(executor: E, notifications_enabled: bool) -> Self {
        Self {
            executor,
            tone_command: DEFAULT_TONE_COMMAND
                .iter()
                .map(|s| s.to_string())
                .collect(),
            notifications_enabled,
        }
    }

    /// Overrides the tone player invocation (first element is the command).
    pub fn with_tone_command(mut self, command: Vec<String>) -> Self {
        self.tone_command = command;
        self
    }
}

impl<E: CommandExecutor> Announcer for DesktopAnnouncer<E> {
    fn play_tone(&self) -> Result<()> {
        let Some((command, args)) = self.tone_command.split_first() else {
            return Ok(());
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.executor.execute(command, &args)
    }

    fn notify(&self, doa: u16) -> Result<()> {
        let body = format!("Voice detected at {doa}\u{00b0}");
        self.executor
            .execute("notify-send", &["whispermon", &body, "--urgency=normal"])
    }

    fn has_permission(&self) -> bool {
        self.notifications_enabled
    }
}

/// Recording announcer for tests.
#[derive(Debug, Clone, Default)]
pub struct MockAnnouncer {
    tones: Arc<Mutex<u32>>,
    notifications: Arc<Mutex<Vec<u16>>>,
    permission: bool,
    fail_calls: bool,
}

impl MockAnnouncer {
    /// Creates a mock with notification permission granted.
    pub fn new() -> Self {
        Self {
            tones: Arc::new(Mutex::new(0)),
            notifications: Arc::new(Mutex::new(Vec::new())),
            permission: true,
            fail_calls: false,
        }
    }

    /// Configures the mock to report no notification permission.
    pub fn without_permission(mut self) -> Self {
        self.permission = false;
        self
    }

    /// Configures every call to fail.
    pub fn with_failures(mut self) -> Self {
        self.fail_calls = true;
        self
    }

    /// Number of tones played so far.
    pub fn tone_count(&self) -> u32 {
        #[allow(clippy::unwrap_used)]
        *self.tones.lock().unwrap()
    }

    /// DOA values notified so far.
    pub fn notified(&self) -> Vec<u16> {
        #[allow(clippy::unwrap_used)]
        self.notifications.lock().unwrap().clone()
    }
}

impl Announcer for MockAnnouncer {
    fn play_tone(&self) -> Result<()> {
        #[allow(clippy::unwrap_used)]
        {
            *self.tones.lock().unwrap() += 1;
        }
        if self.fail_calls {
            Err(MonitorError::Announce {
                message: "mock tone failure".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn notify(&self, doa: u16) -> Result<()> {
        #[allow(clippy::unwrap_used)]
        self.notifications.lock().unwrap().push(doa);
        if self.fail_calls {
            Err(MonitorError::Announce {
                message: "mock notify failure".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn has_permission(&self) -> bool {
        self.permission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Recording executor, after the injector test pattern.
    #[derive(Clone)]
    struct RecordingExecutor {
        commands: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl RecordingExecutor {
        fn new() -> Self {
            Self {
                commands: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                commands: Arc::new(Mutex::new(Vec::new())),
                fail: true,
            }
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    impl CommandExecutor for RecordingExecutor {
        fn execute(&self, command: &str, args: &[&str]) -> Result<()> {
            self.commands
                .lock()
                .unwrap()
                .push(format!("{} {}", command, args.join(" ")));
            if self.fail {
                Err(MonitorError::Announce {
                    message: "mock failure".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn announcer_trait_is_object_safe() {
        let _announcer: Arc<dyn Announcer> = Arc::new(NullAnnouncer);
    }

    #[test]
    fn null_announcer_reports_no_permission() {
        let announcer = NullAnnouncer;
        assert!(!announcer.has_permission());
        assert!(announcer.play_tone().is_ok());
        assert!(announcer.notify(90).is_ok());
    }

    #[test]
    fn desktop_announcer_plays_default_tone() {
        let executor = RecordingExecutor::new();
        let announcer = DesktopAnnouncer::new(executor.clone(), true);

        announcer.play_tone().unwrap();

        let commands = executor.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("paplay"));
    }

    #[test]
    fn desktop_announcer_custom_tone_command() {
        let executor = RecordingExecutor::new();
        let announcer = DesktopAnnouncer::new(executor.clone(), true)
            .with_tone_command(vec!["beep".to_string(), "-f".to_string(), "880".to_string()]);

        announcer.play_tone().unwrap();
        assert_eq!(executor.commands(), vec!["beep -f 880".to_string()]);
    }

    #[test]
    fn desktop_announcer_empty_tone_command_is_noop() {
        let executor = RecordingExecutor::new();
        let announcer = DesktopAnnouncer::new(executor.clone(), true).with_tone_command(vec![]);

        announcer.play_tone().unwrap();
        assert!(executor.commands().is_empty());
    }

    #[test]
    fn desktop_announcer_notify_includes_doa() {
        let executor = RecordingExecutor::new();
        let announcer = DesktopAnnouncer::new(executor.clone(), true);

        announcer.notify(245).unwrap();

        let commands = executor.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("notify-send"));
        assert!(commands[0].contains("245"));
    }

    #[test]
    fn desktop_announcer_permission_flag() {
        let enabled = DesktopAnnouncer::new(RecordingExecutor::new(), true);
        let disabled = DesktopAnnouncer::new(RecordingExecutor::new(), false);
        assert!(enabled.has_permission());
        assert!(!disabled.has_permission());
    }

    #[test]
    fn executor_failure_surfaces_as_announce_error() {
        let announcer = DesktopAnnouncer::new(RecordingExecutor::failing(), true);
        let result = announcer.play_tone();
        assert!(matches!(result, Err(MonitorError::Announce { .. })));
    }

    #[test]
    fn mock_announcer_records_calls() {
        let mock = MockAnnouncer::new();
        mock.play_tone().unwrap();
        mock.play_tone().unwrap();
        mock.notify(12).unwrap();

        assert_eq!(mock.tone_count(), 2);
        assert_eq!(mock.notified(), vec![12]);
    }

    #[test]
    fn mock_announcer_failure_still_records() {
        let mock = MockAnnouncer::new().with_failures();
        assert!(mock.play_tone().is_err());
        assert_eq!(mock.tone_count(), 1);
    }
}
