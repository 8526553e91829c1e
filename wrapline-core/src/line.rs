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

//! Display line payload.

/// Smallest byte accepted anywhere in line content.
const FIRST_PRINTABLE: u8 = 32;

/// Bytes accepted by interactive insertion besides the newline
pub fn is_insertable(byte: u8) -> bool {
    (FIRST_PRINTABLE..127).contains(&byte)
}

/// Bytes kept when loading text; everything else except newline and tab is dropped
pub fn is_loadable(byte: u8) -> bool {
    (FIRST_PRINTABLE..128).contains(&byte)
}

/// One fixed-width slice of a source line.
///
/// The content never exceeds the buffer's display width. `col_start` is the
/// source column of the first byte of `content`, and `line_end` is set on the
/// last display line of each source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLine {
    pub(crate) content: Vec<u8>,
    pub(crate) source_line: usize,
    pub(crate) col_start: usize,
    pub(crate) line_end: bool,
}

impl DisplayLine {
    pub(crate) fn new(source_line: usize, col_start: usize, line_end: bool, content: Vec<u8>) -> Self {
        Self {
            content,
            source_line,
            col_start,
            line_end,
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content as text. Content is always ASCII, so this never loses data.
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.content).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn source_line(&self) -> usize {
        self.source_line
    }

    pub fn col_start(&self) -> usize {
        self.col_start
    }

    /// Source column just past the last byte of this display line
    pub fn col_end(&self) -> usize {
        self.col_start + self.content.len()
    }

    pub fn is_line_end(&self) -> bool {
        self.line_end
    }

    /// True if this is the first display line of its source line
    pub fn is_line_start(&self) -> bool {
        self.col_start == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let line = DisplayLine::new(2, 6, true, b"xyz".to_vec());
        assert_eq!(line.text(), "xyz");
        assert_eq!(line.len(), 3);
        assert_eq!(line.source_line(), 2);
        assert_eq!(line.col_start(), 6);
        assert_eq!(line.col_end(), 9);
        assert!(line.is_line_end());
        assert!(!line.is_line_start());
    }

    #[test]
    fn test_character_classes() {
        assert!(is_insertable(b'a'));
        assert!(is_insertable(b' '));
        assert!(!is_insertable(b'\n'));
        assert!(!is_insertable(b'\t'));
        assert!(!is_insertable(127));
        assert!(is_loadable(127));
        assert!(!is_loadable(31));
        assert!(!is_loadable(200));
    }
}
