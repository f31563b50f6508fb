// ── Autosave timer ────────────────────────────────────────────────────────────
//
// States: Disabled, Idle, PendingSave.  The timer does not own a clock; the
// native shell feeds it elapsed time from its UI-thread timer message, and
// tests feed it durations directly.  A save pass is synchronous and runs on
// the caller's thread.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    error::JotterError,
    manager::{WindowId, WindowManager},
    recent::RecentFiles,
};

/// Where the timer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveState {
    /// Autosave is switched off; elapsed time is ignored.
    Disabled,
    /// Counting towards the next save pass.
    Idle,
    /// The interval has elapsed; `run_pending` should be called.
    PendingSave,
}

/// Outcome of one save pass.
#[derive(Debug, Default)]
pub struct AutosaveReport {
    /// Windows whose document was written.
    pub saved: Vec<WindowId>,
    /// Modified windows skipped because the document has no path.
    pub skipped_untitled: Vec<WindowId>,
    /// Windows whose write failed; they stay modified and are retried next
    /// cycle.
    pub failures: Vec<(WindowId, JotterError)>,
}

impl AutosaveReport {
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty() && self.failures.is_empty()
    }
}

/// Repeating autosave schedule.
#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    state: AutosaveState,
    interval: Duration,
    elapsed: Duration,
}

impl AutosaveTimer {
    /// A timer with the given interval, Idle when `enabled`, else Disabled.
    /// A zero interval is raised to one second.
    pub fn new(interval: Duration, enabled: bool) -> Self {
        Self {
            state: if enabled {
                AutosaveState::Idle
            } else {
                AutosaveState::Disabled
            },
            interval: interval.max(Duration::from_secs(1)),
            elapsed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> AutosaveState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.state != AutosaveState::Disabled
    }

    /// Switch autosave on or off.  Either way the cycle restarts from zero.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.elapsed = Duration::ZERO;
        self.state = if enabled {
            AutosaveState::Idle
        } else {
            AutosaveState::Disabled
        };
        debug!(enabled, "autosave toggled");
    }

    /// Time left until the next pass, or `None` when disabled.
    pub fn remaining(&self) -> Option<Duration> {
        match self.state {
            AutosaveState::Disabled => None,
            AutosaveState::PendingSave => Some(Duration::ZERO),
            AutosaveState::Idle => Some(self.interval.saturating_sub(self.elapsed)),
        }
    }

    /// Account for `elapsed` wall-clock time.  Returns the new state.
    pub fn advance(&mut self, elapsed: Duration) -> AutosaveState {
        if self.state == AutosaveState::Idle {
            self.elapsed += elapsed;
            if self.elapsed >= self.interval {
                self.state = AutosaveState::PendingSave;
            }
        }
        self.state
    }

    /// If a pass is pending, save every modified document that has a path,
    /// then return to Idle.  Returns `None` when no pass was due.
    ///
    /// One document's failure never stops the others from being saved.
    pub fn run_pending(
        &mut self,
        windows: &mut WindowManager,
        recent: &mut RecentFiles,
    ) -> Option<AutosaveReport> {
        if self.state != AutosaveState::PendingSave {
            return None;
        }

        let mut report = AutosaveReport::default();
        for window in windows.iter_mut() {
            let doc = &mut window.document;
            if !doc.is_modified() {
                continue;
            }
            if doc.path().is_none() {
                report.skipped_untitled.push(window.id());
                continue;
            }
            match doc.save(recent) {
                Ok(()) => report.saved.push(window.id()),
                Err(e) => {
                    warn!(window = %window.id(), error = %e, "autosave failed");
                    report.failures.push((window.id(), e));
                }
            }
        }

        debug!(
            saved = report.saved.len(),
            skipped = report.skipped_untitled.len(),
            failed = report.failures.len(),
            "autosave pass"
        );
        self.elapsed = Duration::ZERO;
        self.state = AutosaveState::Idle;
        Some(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
