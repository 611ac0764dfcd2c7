//! Domain types shared across the Pocket IDE crates

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A zero-based line/column position in a text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A selection or highlight region in a text buffer.
///
/// `start == end` represents a collapsed cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Collapsed range at the origin, used when opening a file without a
    /// requested selection.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }
}

/// Classification of an open file, derived from its extension.
///
/// Drives the save policy: saving a `BuildScript` file means the project
/// configuration may have changed (classpath resync), saving a `Markup`
/// file may require regenerating resource classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    /// Language source file (e.g. `.java`)
    Source,
    /// Markup/resource file (e.g. `.xml`)
    Markup,
    /// Project configuration source (e.g. `.gradle`)
    BuildScript,
    /// Anything else
    Other,
}

impl FileKind {
    /// Determine the kind from a path's extension.
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("java") => FileKind::Source,
            Some("xml") => FileKind::Markup,
            Some("gradle") => FileKind::BuildScript,
            _ => FileKind::Other,
        }
    }
}

/// A single hit produced by the project-wide search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// File containing the match
    pub path: PathBuf,
    /// Location of the matched text
    pub range: Range,
    /// The full line the match occurred on, for result display
    pub line_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::of(Path::new("/p/Main.java")), FileKind::Source);
        assert_eq!(FileKind::of(Path::new("/p/layout.xml")), FileKind::Markup);
        assert_eq!(
            FileKind::of(Path::new("/p/build.gradle")),
            FileKind::BuildScript
        );
        assert_eq!(FileKind::of(Path::new("/p/notes.txt")), FileKind::Other);
        assert_eq!(FileKind::of(Path::new("/p/Makefile")), FileKind::Other);
    }

    #[test]
    fn test_range_zero_is_cursor() {
        assert!(Range::zero().is_cursor());
        let r = Range::new(Position::new(1, 0), Position::new(1, 4));
        assert!(!r.is_cursor());
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 0) < Position::new(2, 0));
        assert!(Position::new(3, 2) < Position::new(3, 7));
    }
}
