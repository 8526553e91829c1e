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

//! Structural integrity check.
//!
//! A diagnostic pass over the whole store, meant for tests and debug builds.
//! Every public mutation leaves the buffer in a state this check accepts.

use crate::buffer::Buffer;
use crate::line::{is_loadable, DisplayLine};
use thiserror::Error;

/// The first broken invariant found, with the display row where it shows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("display width must be positive")]
    ZeroWidth,
    #[error("store width {store} differs from configured width {config}")]
    WidthMismatch { store: usize, config: usize },
    #[error("buffer holds no display lines")]
    Empty,
    #[error("display line {0} links to a missing node")]
    DanglingLink(usize),
    #[error("display line {0} has a back link that does not match its predecessor")]
    BrokenBackLink(usize),
    #[error("node links form a cycle")]
    Cycle,
    #[error("{linked} nodes are linked but {stored} are stored")]
    CountMismatch { linked: usize, stored: usize },
    #[error("tail does not point at the last linked node")]
    TailMismatch,
    #[error("cursor hint records index {recorded} but its node is at {actual}")]
    StaleCursor { recorded: usize, actual: usize },
    #[error("first display line starts at source {line}:{col} instead of 0:0")]
    BadFirstLine { line: usize, col: usize },
    #[error("display line {0} continues a source line whose previous display line is not full")]
    ContinuesShortLine(usize),
    #[error("display line {index} starts at column {found}, expected {expected}")]
    WrongColumnStart {
        index: usize,
        found: usize,
        expected: usize,
    },
    #[error("display line {index} jumps from source line {from} to {to}")]
    LineGap { index: usize, from: usize, to: usize },
    #[error("display line {0} has a wrong end-of-line flag")]
    WrongLineEnd(usize),
    #[error("display line {index} holds {len} bytes, more than the width {width}")]
    Overflow {
        index: usize,
        len: usize,
        width: usize,
    },
    #[error("display line {0} is an empty continuation")]
    EmptyContinuation(usize),
    #[error("display line {index} contains byte 0x{byte:02x}")]
    BadByte { index: usize, byte: u8 },
}

impl Buffer {
    /// Verify every structural invariant of the line store.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let width = self.store.width();
        if width == 0 {
            return Err(IntegrityError::ZeroWidth);
        }
        if self.config.display_width != width {
            return Err(IntegrityError::WidthMismatch {
                store: width,
                config: self.config.display_width,
            });
        }
        if self.store.is_empty() {
            return Err(IntegrityError::Empty);
        }
        self.store.check_links()?;

        let mut lines = self.store.iter().peekable();
        let mut prev: Option<&DisplayLine> = None;
        while let Some((node, line)) = lines.next() {
            let index = node.index;

            match prev {
                None => {
                    if line.source_line != 0 || line.col_start != 0 {
                        return Err(IntegrityError::BadFirstLine {
                            line: line.source_line,
                            col: line.col_start,
                        });
                    }
                }
                Some(prev) if prev.source_line == line.source_line => {
                    if prev.len() != width {
                        return Err(IntegrityError::ContinuesShortLine(index));
                    }
                    let expected = prev.col_start + width;
                    if line.col_start != expected {
                        return Err(IntegrityError::WrongColumnStart {
                            index,
                            found: line.col_start,
                            expected,
                        });
                    }
                }
                Some(prev) => {
                    if line.source_line != prev.source_line + 1 {
                        return Err(IntegrityError::LineGap {
                            index,
                            from: prev.source_line,
                            to: line.source_line,
                        });
                    }
                    if line.col_start != 0 {
                        return Err(IntegrityError::WrongColumnStart {
                            index,
                            found: line.col_start,
                            expected: 0,
                        });
                    }
                }
            }

            let ends_here = lines
                .peek()
                .map_or(true, |(_, next)| next.source_line != line.source_line);
            if line.line_end != ends_here {
                return Err(IntegrityError::WrongLineEnd(index));
            }

            if line.len() > width {
                return Err(IntegrityError::Overflow {
                    index,
                    len: line.len(),
                    width,
                });
            }
            if line.is_empty() && line.col_start != 0 {
                return Err(IntegrityError::EmptyContinuation(index));
            }
            if let Some(&byte) = line.content.iter().find(|&&b| !is_loadable(b)) {
                return Err(IntegrityError::BadByte { index, byte });
            }

            prev = Some(line);
        }
        Ok(())
    }
}
