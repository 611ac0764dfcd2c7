//! pide-app - Editor session state and orchestration for Pocket IDE
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! editor screen core: the tab registry, the build/search/language-sync
//! coordinators, and the foreground reactor that keeps them consistent.
//!
//! All state mutation happens on one foreground loop; background work
//! (builds, searches, language-service calls, teardown persistence) runs on
//! spawned tasks whose completions come back as [`Message`] values.

pub mod actions;
pub mod build;
pub mod engine;
pub mod handler;
pub mod language_sync;
pub mod message;
pub mod process;
pub mod registry;
pub mod search;
pub mod session;
pub mod state;

// Re-export primary types
pub use build::{BuildCoordinator, BuildPhase, BuildTicket};
pub use engine::{Engine, EngineOptions};
pub use handler::{UpdateAction, UpdateResult};
pub use language_sync::LanguageSyncCoordinator;
pub use message::{EditorAction, Message};
pub use registry::{SaveResult, SessionRegistry};
pub use search::{SearchCoordinator, SearchTicket};
pub use session::FileSession;
pub use state::{ActionEnablement, OverlayState, ProjectContext, ProjectPhase};

// Re-export collaborator types the presentation layer needs
pub use pide_project::{BuildOutcome, BuildTask, SearchEvent, SearchRequest};
