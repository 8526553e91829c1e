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

//! Rewrap engine.
//!
//! `normalize` repacks the display lines of one source line so that every
//! display line but the last is exactly full, and `resize_columns` re-flows
//! the whole store when the display width changes.

use crate::buffer::Buffer;
use crate::error::BufferError;
use crate::line::DisplayLine;
use crate::store::{LineStore, NodeRef};

impl LineStore {
    /// Restore the packing invariants from `node` to the end of its source
    /// line, pulling bytes forward from following display lines into any
    /// short one and dropping display lines that drain empty.
    ///
    /// Returns the first node of the next source line.
    pub(crate) fn normalize(&mut self, node: NodeRef) -> Result<Option<NodeRef>, BufferError> {
        let width = self.width();
        let mut current = node;

        loop {
            if self.line(current).line_end {
                return Ok(self.next(current));
            }

            let next = self.next(current).ok_or_else(|| {
                BufferError::internal(format!(
                    "display line {} continues into nothing",
                    current.index
                ))
            })?;

            if self.line(next).is_empty() {
                let line_end = self.line(next).line_end;
                self.line_mut(current).line_end = line_end;
                self.remove(next);
                continue;
            }

            let line = self.line(current);
            let col_start = line.col_start + width;
            if line.len() == width {
                self.line_mut(next).col_start = col_start;
                current = next;
                continue;
            }

            let wanted = width - line.len();
            let next_line = self.line_mut(next);
            let take = wanted.min(next_line.len());
            let moved: Vec<u8> = next_line.content.drain(..take).collect();
            next_line.col_start = col_start;
            let left = next_line.len();

            let line = self.line_mut(current);
            line.content.extend_from_slice(&moved);
            if line.len() == width && left != 0 {
                current = next;
            }
        }
    }
}

impl Buffer {
    /// Re-flow the whole buffer for a new display width.
    ///
    /// Content is preserved byte for byte; only the partition into display
    /// lines changes.
    pub fn resize_columns(&mut self, new_width: usize) -> Result<(), BufferError> {
        if new_width == 0 {
            return Err(BufferError::invalid_args("display width must be positive"));
        }
        let old_width = self.store.width();

        // Split anything that no longer fits. A split-off tail longer than
        // the new width is split again when the walk reaches it.
        let mut current = self.store.head();
        while let Some(node) = current {
            let line = self.store.line_mut(node);
            if line.len() > new_width {
                let excess = line.content.split_off(new_width);
                let tail = DisplayLine::new(
                    line.source_line,
                    line.col_start + new_width,
                    line.line_end,
                    excess,
                );
                line.line_end = false;
                self.store.insert_after(Some(node), tail)?;
            }
            let line = self.store.line_mut(node);
            fit_capacity(&mut line.content, new_width);
            current = self.store.next(node);
        }

        self.store.set_width(new_width);
        self.config.display_width = new_width;

        let mut line_start = self.store.head();
        while let Some(node) = line_start {
            line_start = self.store.normalize(node)?;
        }

        tracing::debug!(
            old_width,
            new_width,
            display_lines = self.store.len(),
            "rewrapped buffer"
        );
        self.debug_validate();
        Ok(())
    }
}

/// Size a content vector to hold exactly one full display line
fn fit_capacity(content: &mut Vec<u8>, width: usize) {
    if content.capacity() > width {
        content.shrink_to(width);
    } else {
        content.reserve_exact(width - content.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buffer: &Buffer) -> Vec<(String, usize, usize, bool)> {
        buffer
            .lines()
            .map(|l| (l.text().to_string(), l.source_line(), l.col_start(), l.is_line_end()))
            .collect()
    }

    fn row(text: &str, line: usize, col: usize, end: bool) -> (String, usize, usize, bool) {
        (text.to_string(), line, col, end)
    }

    #[test]
    fn test_shrink_splits_lines() {
        let mut buffer = Buffer::from_text(10, "abcdefgh\nij").unwrap();
        buffer.resize_columns(3).unwrap();
        assert_eq!(
            rows(&buffer),
            vec![
                row("abc", 0, 0, false),
                row("def", 0, 3, false),
                row("gh", 0, 6, true),
                row("ij", 1, 0, true),
            ]
        );
        assert_eq!(buffer.display_width(), 3);
        assert_eq!(buffer.config().display_width, 3);
    }

    #[test]
    fn test_grow_merges_lines() {
        let mut buffer = Buffer::from_text(3, "abcdefgh\nij").unwrap();
        assert_eq!(buffer.line_count(), 4);
        buffer.resize_columns(10).unwrap();
        assert_eq!(
            rows(&buffer),
            vec![row("abcdefgh", 0, 0, true), row("ij", 1, 0, true)]
        );
    }

    #[test]
    fn test_uneven_shrink_repacks_interior_lines() {
        let mut buffer = Buffer::from_text(4, "abcdefg").unwrap();
        buffer.resize_columns(3).unwrap();
        assert_eq!(
            rows(&buffer),
            vec![
                row("abc", 0, 0, false),
                row("def", 0, 3, false),
                row("g", 0, 6, true),
            ]
        );
    }

    #[test]
    fn test_uneven_grow() {
        let mut buffer = Buffer::from_text(3, "abcdefghij").unwrap();
        buffer.resize_columns(4).unwrap();
        assert_eq!(
            rows(&buffer),
            vec![
                row("abcd", 0, 0, false),
                row("efgh", 0, 4, false),
                row("ij", 0, 8, true),
            ]
        );
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut buffer = Buffer::from_text(3, "abcdefgh\n\nxy\nlonger line here").unwrap();
        buffer.resize_columns(5).unwrap();
        let once = rows(&buffer);
        buffer.resize_columns(5).unwrap();
        assert_eq!(rows(&buffer), once);
    }

    #[test]
    fn test_resize_keeps_empty_lines() {
        let mut buffer = Buffer::from_text(3, "abc\n\nd").unwrap();
        buffer.resize_columns(1).unwrap();
        assert_eq!(buffer.to_text(), "abc\n\nd");
        assert_eq!(buffer.line_count(), 5);
        buffer.resize_columns(80).unwrap();
        assert_eq!(buffer.line_count(), 3);
    }

    #[test]
    fn test_resize_rejects_zero() {
        let mut buffer = Buffer::from_text(3, "abc").unwrap();
        assert!(matches!(
            buffer.resize_columns(0),
            Err(BufferError::InvalidArgs(_))
        ));
        assert_eq!(buffer.display_width(), 3);
    }

    #[test]
    fn test_resize_keeps_cursor_exact() {
        let mut buffer = Buffer::from_text(3, "abcdefgh\nij").unwrap();
        buffer.set_cursor_hint(3).unwrap();
        buffer.resize_columns(10).unwrap();
        assert!(buffer.check_integrity().is_ok());
        buffer.resize_columns(2).unwrap();
        assert!(buffer.check_integrity().is_ok());
    }

    #[test]
    fn test_normalize_drops_drained_lines() {
        let mut store = LineStore::new(3);
        let a = store
            .insert_after(None, DisplayLine::new(0, 0, false, b"a".to_vec()))
            .unwrap();
        let b = store
            .insert_after(Some(a), DisplayLine::new(0, 3, false, b"bc".to_vec()))
            .unwrap();
        let c = store
            .insert_after(Some(b), DisplayLine::new(0, 6, false, Vec::new()))
            .unwrap();
        store
            .insert_after(Some(c), DisplayLine::new(0, 9, true, b"d".to_vec()))
            .unwrap();

        assert_eq!(store.normalize(a).unwrap(), None);
        let lines: Vec<(String, usize, bool)> = store
            .iter()
            .map(|(_, l)| (l.text().to_string(), l.col_start(), l.is_line_end()))
            .collect();
        assert_eq!(
            lines,
            vec![("abc".to_string(), 0, false), ("d".to_string(), 3, true)]
        );
    }
}
