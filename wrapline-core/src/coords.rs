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

//! Coordinate mapper between source (line, column) and display (row, column)
//! positions.

use crate::buffer::Buffer;
use crate::error::BufferError;
use std::fmt;
use std::str::FromStr;

/// A column on a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCol {
    /// Byte offset from the start of the source line
    At(usize),
    /// Just past the last byte of the source line
    LineEnd,
}

impl From<usize> for SourceCol {
    fn from(col: usize) -> Self {
        SourceCol::At(col)
    }
}

impl fmt::Display for SourceCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCol::At(col) => write!(f, "{col}"),
            SourceCol::LineEnd => write!(f, "end"),
        }
    }
}

impl FromStr for SourceCol {
    type Err = String;

    /// Parses a column number, or `end` / `-1` for the end of the line
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "end" | "$" | "-1" => Ok(SourceCol::LineEnd),
            other => other
                .parse::<usize>()
                .map(SourceCol::At)
                .map_err(|_| format!("invalid column '{other}'")),
        }
    }
}

/// A position in display space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPos {
    pub row: usize,
    pub col: usize,
}

/// A position in source space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub line: usize,
    pub col: usize,
}

/// Outcome of a scan for a source position
struct Hit {
    pos: DisplayPos,
    /// The column was past the end of the line and got pinned to it
    clamped: bool,
}

impl Buffer {
    /// Map a source position to the display row and column showing it.
    ///
    /// A column on a wrap boundary maps to the end of the earlier row. A
    /// column past the end of the line maps to the end of its last row.
    pub fn get_display_coords(
        &self,
        source_line: usize,
        source_col: SourceCol,
    ) -> Result<DisplayPos, BufferError> {
        self.scan(source_line, source_col)
            .map(|hit| hit.pos)
            .ok_or_else(|| {
                BufferError::invalid_args(format!(
                    "no display position for source {source_line}:{source_col}"
                ))
            })
    }

    /// Map a display position back to its source position.
    /// `col` may equal the row length.
    pub fn get_source_coords(&self, row: usize, col: usize) -> Result<SourcePos, BufferError> {
        let line = self.get_line(row).ok_or_else(|| {
            BufferError::invalid_args(format!("display line {row} out of range"))
        })?;
        if col > line.len() {
            return Err(BufferError::invalid_args(format!(
                "column {col} out of range on display line {row} (length {})",
                line.len()
            )));
        }
        Ok(SourcePos {
            line: line.source_line,
            col: line.col_start + col,
        })
    }

    /// Resolve a source position for editing. Unlike `get_display_coords`, a
    /// column past the end of the line is an error, and a wrap boundary
    /// resolves to the start of the following row.
    pub(crate) fn edit_position(
        &self,
        source_line: usize,
        source_col: usize,
    ) -> Result<DisplayPos, BufferError> {
        let hit = self
            .scan(source_line, SourceCol::At(source_col))
            .filter(|hit| !hit.clamped)
            .ok_or_else(|| {
                BufferError::invalid_args(format!(
                    "source position {source_line}:{source_col} is outside the text"
                ))
            })?;

        let line = self.find(hit.pos.row).map(|node| self.store.line(node))?;
        if hit.pos.col == line.len() && !line.line_end {
            Ok(DisplayPos {
                row: hit.pos.row + 1,
                col: 0,
            })
        } else {
            Ok(hit.pos)
        }
    }

    /// Walk from the cursor hint (or the head) toward the target position.
    fn scan(&self, source_line: usize, source_col: SourceCol) -> Option<Hit> {
        let start = self.store.cursor().or_else(|| self.store.head())?;
        let anchor = self.store.line(start);
        let backward = source_line < anchor.source_line
            || (source_line == anchor.source_line
                && anchor.col_start > 0
                && matches!(source_col, SourceCol::At(col) if col <= anchor.col_start));

        let mut current = Some(start);
        while let Some(node) = current {
            let line = self.store.line(node);
            if (backward && line.source_line < source_line)
                || (!backward && line.source_line > source_line)
            {
                break;
            }

            if line.source_line == source_line {
                match source_col {
                    SourceCol::LineEnd if line.line_end => {
                        return Some(Hit {
                            pos: DisplayPos {
                                row: node.index,
                                col: line.len(),
                            },
                            clamped: false,
                        });
                    }
                    SourceCol::LineEnd => {}
                    SourceCol::At(col) => {
                        let past_start = line.col_start == 0 || col > line.col_start;
                        let before_end = col <= line.col_end();
                        if past_start && before_end {
                            return Some(Hit {
                                pos: DisplayPos {
                                    row: node.index,
                                    col: col - line.col_start,
                                },
                                clamped: false,
                            });
                        }
                        if !before_end && line.line_end {
                            return Some(Hit {
                                pos: DisplayPos {
                                    row: node.index,
                                    col: line.len(),
                                },
                                clamped: true,
                            });
                        }
                    }
                }
            }

            current = if backward {
                self.store.prev(node)
            } else {
                self.store.next(node)
            };
        }
        None
    }
}
