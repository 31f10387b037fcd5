//! Terminal rendering for the live monitor.
//!
//! One rewritten status line carries the live reading (voice sparkline,
//! DOA, counter, visible alerts); raised and dismissed alerts get their
//! own log lines so they survive the line rewrites.

use crate::monitor::alerts::AlertEvent;
use crate::monitor::event::MonitorEvent;
use crate::monitor::sink::{AlertSink, ChartSink};
use crate::signal::snapshot::HistoryPoint;
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};

/// Clear the rewritten status line.
pub fn clear_line() {
    eprint!("\r{:78}\r", "");
    let _ = io::stderr().flush();
}

/// Render a monitor event as a log line.
///
/// Snapshot events are only shown at verbosity >= 2; they arrive ten
/// times a second and drown everything else otherwise.
pub fn render_event(event: &MonitorEvent, verbosity: u8) {
    let color = io::stderr().is_terminal();
    match event {
        MonitorEvent::AlertRaised { id, doa, .. } => {
            clear_line();
            let line = format!("alert #{id} — voice detected at {doa}\u{00b0}");
            if color {
                eprintln!("{}", line.yellow().bold());
            } else {
                eprintln!("{line}");
            }
        }
        MonitorEvent::AlertDismissing { id } => {
            if verbosity >= 1 {
                clear_line();
                eprintln!("alert #{id} dismissing");
            }
        }
        MonitorEvent::AlertRemoved { id } => {
            if verbosity >= 1 {
                clear_line();
                eprintln!("alert #{id} removed");
            }
        }
        MonitorEvent::CounterReset => {
            clear_line();
            eprintln!("voice counter reset");
        }
        MonitorEvent::VoiceEnded => {
            if verbosity >= 2 {
                clear_line();
                eprintln!("voice ended");
            }
        }
        MonitorEvent::Snapshot {
            snapshot,
            voice_total,
        } => {
            if verbosity >= 2 {
                clear_line();
                eprintln!(
                    "snapshot doa={:03} voice={} total={}",
                    snapshot.doa, snapshot.is_voice, voice_total
                );
            }
        }
        MonitorEvent::Stopped => {}
    }
}

#[derive(Debug, Default)]
struct TerminalState {
    alert_count: usize,
    voiced_in_window: usize,
}

/// Status-line sink for the CLI.
///
/// Clones share state, so the same sink instance can be handed to the
/// monitor as both the chart and the alert consumer.
#[derive(Debug, Clone)]
pub struct TerminalSink {
    state: Arc<Mutex<TerminalState>>,
    quiet: bool,
}

impl TerminalSink {
    /// Creates a terminal sink. `quiet` suppresses the status line.
    pub fn new(quiet: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(TerminalState::default())),
            quiet,
        }
    }

    fn render(&self, history: &[HistoryPoint]) {
        if self.quiet {
            return;
        }
        let Some(last) = history.last() else {
            return;
        };

        let sparkline: String = history
            .iter()
            .map(|p| if p.is_voice { '█' } else { '░' })
            .collect();

        let (alerts, voiced) = {
            #[allow(clippy::unwrap_used)]
            let mut state = self.state.lock().unwrap();
            state.voiced_in_window = history.iter().filter(|p| p.is_voice).count();
            (state.alert_count, state.voiced_in_window)
        };

        let status = if last.is_voice { "VOICE " } else { "silent" };
        eprint!(
            "\r[{:<30}] DOA {:03}\u{00b0} {} window:{:02} alerts:{} {} ",
            sparkline, last.doa, status, voiced, alerts, last.label
        );
        let _ = io::stderr().flush();
    }
}

impl ChartSink for TerminalSink {
    fn on_history(&mut self, history: &[HistoryPoint]) {
        self.render(history);
    }

    fn name(&self) -> &'static str {
        "terminal"
    }
}

impl AlertSink for TerminalSink {
    fn on_alerts(&mut self, alerts: &[AlertEvent]) {
        #[allow(clippy::unwrap_used)]
        {
            self.state.lock().unwrap().alert_count =
                alerts.iter().filter(|a| !a.dismissing).count();
        }
    }

    fn name(&self) -> &'static str {
        "terminal"
    }
}
