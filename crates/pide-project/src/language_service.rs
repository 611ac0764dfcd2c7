//! Language-analysis service capability

use std::path::Path;

use serde_json::json;

use pide_core::prelude::*;

/// Result of a successful service initialization
#[derive(Debug, Clone, Default)]
pub struct InitResult {
    /// Server-reported identification, if any
    pub server_info: Option<String>,
}

/// Language-analysis service capability.
///
/// The core treats the service as opaque: it starts it once per project,
/// pushes classpath configuration when project composition changes, and
/// shuts it down with the project. Service internals (transport, protocol)
/// live behind this trait.
#[trait_variant::make(LanguageService: Send)]
pub trait LocalLanguageService {
    /// Start the service process/connection. Idempotency is the caller's
    /// concern; implementations may assume at most one start per project.
    async fn start(&self) -> Result<()>;

    /// Initialize for a project. `None` means the service produced no
    /// init result — treated by the caller as a silent startup failure.
    async fn init(&self, project_path: &Path) -> Result<Option<InitResult>>;

    /// Notify the service that initialization is complete.
    async fn initialized(&self) -> Result<()>;

    /// Send a configuration-change notification. The payload comes from
    /// [`configuration_payload`].
    async fn push_config(&self, config: &serde_json::Value) -> Result<()>;

    /// Shut down the service and release its resources.
    async fn shutdown_all(&self) -> Result<()>;
}

/// Serialized configuration-change payload sent to the service.
///
/// Shape: `{"java": {"classPath": [...]}}`.
pub fn configuration_payload(class_paths: &[String]) -> serde_json::Value {
    json!({
        "java": {
            "classPath": class_paths,
        }
    })
}

/// Stand-in service used when no language analysis backend is available.
///
/// `init` reports no result, so the core surfaces degraded status text
/// instead of marking the service started; a configuration push against
/// it reports the service as unavailable.
#[derive(Debug, Clone, Default)]
pub struct NullLanguageService;

impl LanguageService for NullLanguageService {
    async fn start(&self) -> Result<()> {
        debug!("Null language service started");
        Ok(())
    }

    async fn init(&self, project_path: &Path) -> Result<Option<InitResult>> {
        debug!(
            "Null language service init for {} (no result)",
            project_path.display()
        );
        Ok(None)
    }

    async fn initialized(&self) -> Result<()> {
        Ok(())
    }

    async fn push_config(&self, _config: &serde_json::Value) -> Result<()> {
        Err(Error::service_unavailable("no language service attached"))
    }

    async fn shutdown_all(&self) -> Result<()> {
        Ok(())
    }
}
