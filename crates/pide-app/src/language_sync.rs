//! Tracks language-service startup and when configuration is pushable

/// Gate in front of the language service: starts it once, and only lets
/// configuration pushes through after initialization succeeded.
#[derive(Debug, Default)]
pub struct LanguageSyncCoordinator {
    service_started: bool,
    start_requested: bool,
}

impl LanguageSyncCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether startup should be dispatched now. Idempotent: returns
    /// `true` only on the first call while the service is down.
    pub fn ensure_started(&mut self) -> bool {
        if self.service_started || self.start_requested {
            return false;
        }
        self.start_requested = true;
        true
    }

    /// The service completed its initialize handshake
    pub fn mark_initialized(&mut self) {
        self.service_started = true;
        self.start_requested = false;
    }

    /// Startup or initialize failed; a later `ensure_started` may retry
    pub fn mark_start_failed(&mut self) {
        self.service_started = false;
        self.start_requested = false;
    }

    /// Configuration pushes are only valid against a started service
    pub fn service_started(&self) -> bool {
        self.service_started
    }
}
