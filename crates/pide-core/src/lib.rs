//! # pide-core - Core Domain Types
//!
//! Foundation crate for Pocket IDE. Provides domain types, error handling,
//! and logging setup for the editor session core.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`FileKind`] - Classification of an open file (Source, Markup, BuildScript, Other)
//! - [`Position`], [`Range`] - Text locations used for selections and search hits
//! - [`SearchMatch`] - A single project-search hit with its location range
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with recoverable classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use pide_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all Pocket IDE crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use types::{FileKind, Position, Range, SearchMatch};
