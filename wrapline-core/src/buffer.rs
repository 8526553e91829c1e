// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::line::DisplayLine;
use crate::store::{LineStore, NodeRef};

/// The wrapped line buffer.
///
/// Holds a text as a sequence of display lines no wider than
/// `display_width`. A fresh buffer holds one empty source line.
#[derive(Debug, Clone)]
pub struct Buffer {
    pub(crate) store: LineStore,
    pub(crate) config: BufferConfig,
    /// Whether saving writes a newline after the final source line
    pub(crate) trailing_newline: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        let config = BufferConfig::default();
        Self {
            store: LineStore::with_empty_line(config.display_width),
            config,
            trailing_newline: true,
        }
    }
}

impl Buffer {
    /// Create an empty buffer wrapping at `display_width` columns
    pub fn new(display_width: usize) -> Result<Self, BufferError> {
        Self::with_config(BufferConfig::default().with_display_width(display_width))
    }

    pub fn with_config(config: BufferConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self {
            store: LineStore::with_empty_line(config.display_width),
            config,
            trailing_newline: true,
        })
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    pub fn display_width(&self) -> usize {
        self.store.width()
    }

    /// Number of display lines
    pub fn line_count(&self) -> usize {
        self.store.len()
    }

    /// Number of source lines
    pub fn source_line_count(&self) -> usize {
        self.store
            .tail()
            .map_or(0, |tail| self.store.line(tail).source_line + 1)
    }

    /// Read-only view of the display line at `index`
    pub fn get_line(&self, index: usize) -> Option<&DisplayLine> {
        self.store
            .find_by_index(index)
            .map(|node| self.store.line(node))
    }

    /// All display lines, front to back
    pub fn lines(&self) -> impl Iterator<Item = &DisplayLine> + '_ {
        self.store.iter().map(|(_, line)| line)
    }

    /// Move the lookup hint to display line `index`.
    /// Advisory only: it speeds up lookups near `index`.
    pub fn set_cursor_hint(&mut self, index: usize) -> Result<(), BufferError> {
        let node = self.find(index)?;
        self.store.set_cursor(Some(node));
        Ok(())
    }

    pub fn clear_cursor_hint(&mut self) {
        self.store.set_cursor(None);
    }

    /// Display line the lookup hint currently sits on
    pub fn cursor_hint(&self) -> Option<usize> {
        self.store.cursor().map(|cursor| cursor.index)
    }

    /// Whether `save` ends the final source line with a newline
    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn set_trailing_newline(&mut self, trailing_newline: bool) {
        self.trailing_newline = trailing_newline;
    }

    /// Full text of one source line, joined across its display lines
    pub fn source_line_text(&self, source_line: usize) -> Option<String> {
        let mut text = String::new();
        let mut found = false;
        for line in self.lines() {
            if line.source_line > source_line {
                break;
            }
            if line.source_line == source_line {
                text.push_str(line.text());
                found = true;
            }
        }
        found.then_some(text)
    }

    /// The text exactly as `save` would write it
    pub fn to_text(&self) -> String {
        let last = self.store.len().saturating_sub(1);
        let mut text = String::new();
        for (node, line) in self.store.iter() {
            text.push_str(line.text());
            if line.line_end && (node.index != last || self.trailing_newline) {
                text.push('\n');
            }
        }
        text
    }

    pub(crate) fn find(&self, index: usize) -> Result<NodeRef, BufferError> {
        self.store.find_by_index(index).ok_or_else(|| {
            BufferError::invalid_args(format!(
                "display line {index} out of range (count {})",
                self.store.len()
            ))
        })
    }

    /// Re-run the integrity check after a mutation in debug builds.
    pub(crate) fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        if let Err(err) = self.check_integrity() {
            tracing::error!(%err, "line buffer integrity violated");
            panic!("line buffer integrity violated: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_buffer_has_one_empty_line() {
        let buffer = Buffer::new(3).unwrap();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.source_line_count(), 1);
        let line = buffer.get_line(0).unwrap();
        assert_eq!(line.text(), "");
        assert_eq!(line.source_line(), 0);
        assert_eq!(line.col_start(), 0);
        assert!(line.is_line_end());
        assert!(buffer.get_line(1).is_none());
        assert!(buffer.check_integrity().is_ok());
    }

    #[test]
    fn test_default_uses_default_config() {
        let buffer = Buffer::default();
        assert_eq!(buffer.display_width(), 80);
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(matches!(Buffer::new(0), Err(BufferError::InvalidArgs(_))));
    }

    #[test]
    fn test_cursor_hint() {
        let mut buffer = Buffer::from_text(3, "abcdefg\nhi").unwrap();
        assert_eq!(buffer.cursor_hint(), None);
        buffer.set_cursor_hint(2).unwrap();
        assert_eq!(buffer.cursor_hint(), Some(2));
        assert_eq!(buffer.get_line(3).unwrap().text(), "hi");
        assert!(buffer.set_cursor_hint(4).is_err());
        assert_eq!(buffer.cursor_hint(), Some(2));
        buffer.clear_cursor_hint();
        assert_eq!(buffer.cursor_hint(), None);
    }

    #[test]
    fn test_to_text_matches_save() {
        for text in ["", "\n", "abcdef", "abcdef\n\nxy\n", "a\nbcdefg"] {
            let buffer = Buffer::from_text(3, text).unwrap();
            let mut saved = Vec::new();
            buffer.save(&mut saved).unwrap();
            assert_eq!(buffer.to_text().as_bytes(), saved.as_slice());
            assert_eq!(buffer.to_text(), text);
        }

        let mut buffer = Buffer::new(3).unwrap();
        buffer.insert_char(0, 0, b'a').unwrap();
        assert_eq!(buffer.to_text(), "a\n");
        buffer.set_trailing_newline(false);
        assert_eq!(buffer.to_text(), "a");
    }

    #[test]
    fn test_source_line_text() {
        let buffer = Buffer::from_text(3, "abcdefg\nhi").unwrap();
        assert_eq!(buffer.source_line_text(0).as_deref(), Some("abcdefg"));
        assert_eq!(buffer.source_line_text(1).as_deref(), Some("hi"));
        assert_eq!(buffer.source_line_text(2), None);
        assert_eq!(buffer.to_text(), "abcdefg\nhi");
    }
}
