//! # pide-project - External Project Collaborators
//!
//! Capability interfaces and implementations the session core calls into:
//! build execution, language-analysis service, project-wide search, file
//! persistence, and persistent preferences.
//!
//! Depends on [`pide_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Build Execution
//! - [`BuildRunner`] - Capability trait for running build tasks
//! - [`GradleRunner`] - Implementation spawning the Gradle wrapper
//! - [`BuildTask`], [`BuildOutcome`] - Task catalog and completion report
//!
//! ### Language Service
//! - [`LanguageService`] - Capability trait (start/init/push-config/shutdown)
//! - [`NullLanguageService`] - No-op implementation for degraded operation
//!
//! ### Project Search
//! - [`SearchRequest`], [`SearchEvent`] - Request and streamed results
//! - [`search_recursive()`] - Cancellable recursive search over source roots
//!
//! ### Persistence
//! - [`Persistence`] - File-save capability trait
//! - [`DiskPersistence`] - Plain filesystem implementation
//! - [`Preferences`] - Remembered opened-project state (TOML on disk)

pub mod build_runner;
pub mod language_service;
pub mod persist;
pub mod preferences;
pub mod search;

pub use build_runner::{has_gradle_wrapper, BuildOutcome, BuildRunner, BuildTask, GradleRunner};
pub use language_service::{
    configuration_payload, InitResult, LanguageService, NullLanguageService,
};
pub use persist::{DiskPersistence, Persistence};
pub use preferences::Preferences;
pub use search::{search_recursive, SearchEvent, SearchRequest};
