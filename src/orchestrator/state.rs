//! Bootstrap State Management and Phase Tracking
//!
//! - `BootstrapPhase`: the discrete steps of a run, plus the terminal states
//! - `BootstrapState`: current phase, completed steps, and failure details
//!
//! The runner only ever moves forward one step at a time, or into `Failed`.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, SystemTimeError};

/// Phase enumeration - discrete states in the bootstrap lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BootstrapPhase {
    /// Nothing has run yet
    Pending,

    /// Step 1: toolchain version query and marker check
    VersionGate,

    /// Step 2: git submodule initialize/update
    SubmoduleSync,

    /// Step 3: dependency configure + parallel build
    DependencyBuild,

    /// Step 4: project build tool against the smoke target
    SmokeBuild,

    /// All steps succeeded
    Completed,

    /// A step failed; the run is over
    Failed,
}

impl BootstrapPhase {
    /// The four steps, in the order they run.
    pub const STEPS: [BootstrapPhase; 4] = [
        BootstrapPhase::VersionGate,
        BootstrapPhase::SubmoduleSync,
        BootstrapPhase::DependencyBuild,
        BootstrapPhase::SmokeBuild,
    ];

    /// Get the human-readable name for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            BootstrapPhase::Pending => "pending",
            BootstrapPhase::VersionGate => "version gate",
            BootstrapPhase::SubmoduleSync => "submodule sync",
            BootstrapPhase::DependencyBuild => "dependency build",
            BootstrapPhase::SmokeBuild => "smoke build",
            BootstrapPhase::Completed => "completed",
            BootstrapPhase::Failed => "failed",
        }
    }

    /// Get all valid phase transitions FROM this phase.
    pub fn valid_next_phases(&self) -> Vec<BootstrapPhase> {
        match self {
            BootstrapPhase::Pending => vec![BootstrapPhase::VersionGate, BootstrapPhase::Failed],
            BootstrapPhase::VersionGate => {
                vec![BootstrapPhase::SubmoduleSync, BootstrapPhase::Failed]
            }
            BootstrapPhase::SubmoduleSync => {
                vec![BootstrapPhase::DependencyBuild, BootstrapPhase::Failed]
            }
            BootstrapPhase::DependencyBuild => {
                vec![BootstrapPhase::SmokeBuild, BootstrapPhase::Failed]
            }
            BootstrapPhase::SmokeBuild => vec![BootstrapPhase::Completed, BootstrapPhase::Failed],
            BootstrapPhase::Completed | BootstrapPhase::Failed => vec![],
        }
    }

    /// Check if a transition to the given phase is valid.
    pub fn can_transition_to(&self, next: BootstrapPhase) -> bool {
        self.valid_next_phases().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BootstrapPhase::Completed | BootstrapPhase::Failed)
    }
}

/// Snapshot of a bootstrap run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapState {
    /// Current phase
    pub phase: BootstrapPhase,

    /// Steps that finished successfully, in order
    pub completed: Vec<BootstrapPhase>,

    /// Step that was running when the run failed
    pub failed_phase: Option<BootstrapPhase>,

    /// Error message if a step failed
    pub error: Option<String>,

    pub start_time: SystemTime,

    pub last_update_time: SystemTime,
}

impl Default for BootstrapState {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapState {
    pub fn new() -> Self {
        let now = SystemTime::now();
        BootstrapState {
            phase: BootstrapPhase::Pending,
            completed: Vec::new(),
            failed_phase: None,
            error: None,
            start_time: now,
            last_update_time: now,
        }
    }

    /// Attempt to transition to the next phase.
    ///
    /// Leaving a step phase for anything but `Failed` marks it completed.
    pub fn transition_to(&mut self, next_phase: BootstrapPhase) -> Result<(), String> {
        if !self.phase.can_transition_to(next_phase) {
            return Err(format!(
                "{} -> {}",
                self.phase.as_str(),
                next_phase.as_str()
            ));
        }

        if next_phase != BootstrapPhase::Failed && BootstrapPhase::STEPS.contains(&self.phase) {
            self.completed.push(self.phase);
        }

        self.phase = next_phase;
        self.last_update_time = SystemTime::now();
        Ok(())
    }

    /// Record an error and mark the run as failed.
    pub fn record_error(&mut self, error: String) {
        if !self.phase.is_terminal() {
            self.failed_phase = Some(self.phase);
        }
        self.error = Some(error);
        self.phase = BootstrapPhase::Failed;
        self.last_update_time = SystemTime::now();
    }

    pub fn is_completed(&self) -> bool {
        self.phase == BootstrapPhase::Completed
    }

    /// Get time elapsed since the run started.
    pub fn elapsed_since_start(&self) -> Result<Duration, SystemTimeError> {
        self.start_time.elapsed()
    }
}
