//! Text insertion into a note file on disk

use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use super::TextInserter;
use crate::error::PasteError;

/// Byte range selected in the active note. An empty range is a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// A collapsed selection at `offset`
    pub fn cursor(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

impl FromStr for Selection {
    type Err = String;

    /// Parses `START..END` or a bare cursor offset
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid offset '{}': {}", v, e))
        };

        let selection = match s.split_once("..") {
            Some((start, end)) => Selection {
                start: parse(start)?,
                end: parse(end)?,
            },
            None => Selection::cursor(parse(s)?),
        };

        if selection.start > selection.end {
            return Err(format!("selection start {} is after end {}", selection.start, selection.end));
        }
        Ok(selection)
    }
}

/// Inserts text into a note file, replacing the selection.
///
/// Without a selection the text is appended. After an insertion the cursor
/// sits right after the inserted text.
#[derive(Debug, Clone)]
pub struct DocumentInserter {
    path: PathBuf,
    selection: Option<Selection>,
}

impl DocumentInserter {
    pub fn new(path: impl Into<PathBuf>, selection: Option<Selection>) -> Self {
        Self {
            path: path.into(),
            selection,
        }
    }

    /// Current selection, if one was given or set by a previous insertion
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }
}

impl TextInserter for DocumentInserter {
    fn insert(&mut self, text: &str) -> Result<(), PasteError> {
        let display = self.path.display().to_string();
        let mut document = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(PasteError::storage("read note", display, e)),
        };

        let selection = self.selection.unwrap_or(Selection::cursor(document.len()));
        if selection.end > document.len()
            || !document.is_char_boundary(selection.start)
            || !document.is_char_boundary(selection.end)
        {
            return Err(PasteError::storage(
                "insert into",
                display,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("selection {}..{} is outside the note text", selection.start, selection.end),
                ),
            ));
        }

        document.replace_range(selection.start..selection.end, text);
        std::fs::write(&self.path, &document).map_err(|e| PasteError::storage("write note", display, e))?;

        info!("Inserted {} bytes into {}", text.len(), self.path.display());
        self.selection = Some(Selection::cursor(selection.start + text.len()));
        Ok(())
    }
}
