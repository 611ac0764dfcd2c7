//! Build lifecycle gating and stale-completion suppression

use pide_core::prelude::*;
use pide_project::BuildTask;

/// Where the build pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// No build runner attached; every request is refused
    NoRunner,
    /// Runner attached, nothing running
    Idle,
    /// Exactly one task in flight
    Building,
}

/// Handed out when a build is admitted; the epoch ties the eventual
/// completion back to the request that started it.
#[derive(Debug, Clone)]
pub struct BuildTicket {
    pub task: BuildTask,
    pub epoch: u64,
}

/// Serializes build requests: at most one task in flight, and
/// completions from a superseded epoch are dropped.
#[derive(Debug)]
pub struct BuildCoordinator {
    phase: BuildPhase,
    epoch: u64,
}

impl Default for BuildCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildCoordinator {
    pub fn new() -> Self {
        Self {
            phase: BuildPhase::NoRunner,
            epoch: 0,
        }
    }

    /// Called once at startup when a runner is available for the project
    pub fn attach_runner(&mut self) {
        if self.phase == BuildPhase::NoRunner {
            self.phase = BuildPhase::Idle;
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn is_building(&self) -> bool {
        self.phase == BuildPhase::Building
    }

    /// Build menu entries are usable only when a runner is attached and idle
    pub fn controls_enabled(&self) -> bool {
        self.phase == BuildPhase::Idle
    }

    /// Admit a task, moving to `Building`.
    pub fn request(&mut self, task: BuildTask) -> Result<BuildTicket> {
        match self.phase {
            BuildPhase::NoRunner => Err(Error::BuildUnavailable),
            BuildPhase::Building => Err(Error::AlreadyBuilding),
            BuildPhase::Idle => {
                self.epoch += 1;
                self.phase = BuildPhase::Building;
                debug!(epoch = self.epoch, task = %task.label(), "build admitted");
                Ok(BuildTicket {
                    task,
                    epoch: self.epoch,
                })
            }
        }
    }

    /// Record a completion. Returns `false` when the epoch is stale
    /// (the coordinator was reset or torn down since the request) and
    /// the result must be ignored.
    pub fn finish(&mut self, epoch: u64) -> bool {
        if self.phase != BuildPhase::Building || epoch != self.epoch {
            debug!(epoch, current = self.epoch, "stale build completion dropped");
            return false;
        }
        self.phase = BuildPhase::Idle;
        true
    }

    /// Detach the runner for teardown. Bumps the epoch so any in-flight
    /// completion is treated as stale.
    pub fn exit(&mut self) {
        self.epoch += 1;
        self.phase = BuildPhase::NoRunner;
    }
}
