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

//! Mutation engine: single-byte insertion and deletion.
//!
//! The primitive operations address a display row and a column inside that
//! row. Overflow from a full row cascades one byte at a time into the rows
//! that follow, and a deletion pulls one byte back from each following row of
//! the same source line. Both cascades are loops bounded by the length of the
//! source line being edited.
//!
//! The `*_at` variants take source coordinates and resolve them through the
//! coordinate mapper first.

use crate::buffer::Buffer;
use crate::coords::SourceCol;
use crate::error::BufferError;
use crate::line::{is_insertable, DisplayLine};
use crate::store::NodeRef;

impl Buffer {
    /// Insert `ch` at column `col` of display row `row`.
    ///
    /// `col` may equal the row length only on the last row of a source line.
    /// A newline splits the source line in two.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: u8) -> Result<(), BufferError> {
        if ch != b'\n' && !is_insertable(ch) {
            return Err(BufferError::InvalidCharacter(ch));
        }

        let node = self.find(row)?;
        let line = self.store.line(node);
        let limit = if line.line_end { line.len() } else { line.len().saturating_sub(1) };
        if col > limit || (!line.line_end && line.is_empty()) {
            return Err(BufferError::invalid_args(format!(
                "column {col} out of range on display line {row} (max {limit})"
            )));
        }

        tracing::trace!(row, col, ch, "insert");
        if ch == b'\n' {
            self.split_line(node, col)?;
        } else {
            self.insert_byte(node, col, ch)?;
        }
        self.debug_validate();
        Ok(())
    }

    /// Remove the byte at column `col` of display row `row`.
    pub fn delete_char(&mut self, row: usize, col: usize) -> Result<(), BufferError> {
        let node = self.find(row)?;
        let len = self.store.line(node).len();
        if col >= len {
            return Err(BufferError::invalid_args(format!(
                "column {col} out of range on display line {row} (length {len})"
            )));
        }

        tracing::trace!(row, col, "delete");
        self.remove_byte(node, col)?;
        self.debug_validate();
        Ok(())
    }

    /// Remove the newline preceding display row `row`, joining its source
    /// line onto the previous one.
    ///
    /// Nothing happens on the first row, or on a row that continues a wrapped
    /// source line since no newline precedes it.
    pub fn delete_line_break(&mut self, row: usize) -> Result<(), BufferError> {
        let node = self.find(row)?;
        let Some(prev) = self.store.prev(node) else {
            return Ok(());
        };
        if !self.store.line(prev).line_end {
            return Ok(());
        }

        tracing::trace!(row, "join");
        self.store.shift_source_lines(Some(node), -1);
        self.store.line_mut(prev).line_end = false;
        self.store.normalize(prev)?;
        self.debug_validate();
        Ok(())
    }

    /// Insert `ch` at a source position. `source_col` may equal the source
    /// line length to append.
    pub fn insert_at(
        &mut self,
        source_line: usize,
        source_col: usize,
        ch: u8,
    ) -> Result<(), BufferError> {
        let pos = self.edit_position(source_line, source_col)?;
        self.insert_char(pos.row, pos.col, ch)
    }

    /// Remove the byte at a source position
    pub fn delete_at(&mut self, source_line: usize, source_col: usize) -> Result<(), BufferError> {
        let pos = self.edit_position(source_line, source_col)?;
        self.delete_char(pos.row, pos.col)
    }

    /// Remove the newline ending `source_line`, joining the next source line
    /// onto it. Nothing happens on the last source line.
    pub fn join_lines(&mut self, source_line: usize) -> Result<(), BufferError> {
        if source_line >= self.source_line_count() {
            return Err(BufferError::invalid_args(format!(
                "source line {source_line} does not exist"
            )));
        }
        if source_line + 1 == self.source_line_count() {
            return Ok(());
        }
        let pos = self.get_display_coords(source_line + 1, SourceCol::At(0))?;
        self.delete_line_break(pos.row)
    }

    /// Insert one printable byte, carrying the overflow of each full row to
    /// the start of the next row of the same source line.
    fn insert_byte(&mut self, node: NodeRef, col: usize, ch: u8) -> Result<(), BufferError> {
        let width = self.store.width();
        let mut current = node;
        let mut col = col;
        let mut ch = ch;

        loop {
            let line = self.store.line_mut(current);
            let overflow = line.len() == width || col == width;
            let carry = if col < width {
                line.content.insert(col, ch);
                if overflow {
                    line.content.pop()
                } else {
                    None
                }
            } else {
                Some(ch)
            };

            let Some(carry) = carry else {
                return Ok(());
            };

            if line.line_end {
                let continuation =
                    DisplayLine::new(line.source_line, line.col_start + width, true, Vec::new());
                line.line_end = false;
                self.store.insert_after(Some(current), continuation)?;
            }

            current = self.store.next(current).ok_or_else(|| {
                BufferError::internal(format!(
                    "no display line to carry overflow into after {}",
                    current.index
                ))
            })?;
            col = 0;
            ch = carry;
        }
    }

    /// Split the source line at `col` of `node`; everything after the split
    /// point moves to a new source line.
    fn split_line(&mut self, node: NodeRef, col: usize) -> Result<(), BufferError> {
        let line = self.store.line_mut(node);
        let suffix = line.content.split_off(col);
        let source_line = line.source_line;
        let line_end = line.line_end;
        let emptied_continuation = line.is_empty() && line.col_start != 0;
        line.line_end = true;

        let new_line = self
            .store
            .insert_after(Some(node), DisplayLine::new(source_line + 1, 0, line_end, suffix))?;
        let after = self.store.next(new_line);
        self.store.shift_source_lines(after, 1);
        self.store.normalize(new_line)?;

        // Splitting at the start of a continuation row leaves it empty; the
        // previous row of the same source line becomes its end.
        if emptied_continuation {
            self.store.remove(node);
        }
        Ok(())
    }

    /// Delete one byte, pulling the first byte of each following row of the
    /// same source line back by one position.
    fn remove_byte(&mut self, node: NodeRef, col: usize) -> Result<(), BufferError> {
        let mut current = node;
        let mut col = col;

        loop {
            let line = self.store.line_mut(current);
            line.content.remove(col);

            if line.line_end {
                if line.is_empty() && line.col_start != 0 {
                    self.store.remove(current);
                }
                return Ok(());
            }

            let next = self.store.next(current).ok_or_else(|| {
                BufferError::internal(format!(
                    "display line {} continues into nothing",
                    current.index
                ))
            })?;
            let pulled = self.store.line(next).content.first().copied().ok_or_else(|| {
                BufferError::internal(format!("empty continuation at display line {}", next.index))
            })?;
            self.store.line_mut(current).content.push(pulled);
            current = next;
            col = 0;
        }
    }
}
