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

//! Bulk load and save of newline-delimited text.

use crate::buffer::Buffer;
use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::line::{is_loadable, DisplayLine};
use crate::store::LineStore;
use std::io::{BufReader, Read, Write};

/// Accumulates loaded bytes into display lines at the end of a store
struct LineBuilder {
    store: LineStore,
    width: usize,
    tab_size: usize,
    pending: Vec<u8>,
    source_line: usize,
    col_start: usize,
    /// Column on the raw source line; drives tab stops
    source_col: usize,
    trailing_newline: bool,
}

impl LineBuilder {
    fn new(config: &BufferConfig) -> Self {
        Self {
            store: LineStore::new(config.display_width),
            width: config.display_width,
            tab_size: config.tab_size,
            pending: Vec::with_capacity(config.display_width),
            source_line: 0,
            col_start: 0,
            source_col: 0,
            trailing_newline: false,
        }
    }

    fn feed(&mut self, byte: u8) -> Result<(), BufferError> {
        match byte {
            b'\n' => {
                // A line that exactly filled its last row needs no empty row.
                if !self.pending.is_empty() || self.col_start == 0 {
                    self.emit()?;
                }
                self.source_line += 1;
                self.col_start = 0;
                self.source_col = 0;
                self.trailing_newline = true;
            }
            b'\t' => {
                let spaces = self.tab_size - self.source_col % self.tab_size;
                for _ in 0..spaces {
                    self.push(b' ')?;
                }
            }
            byte if is_loadable(byte) => self.push(byte)?,
            _ => {}
        }
        Ok(())
    }

    fn push(&mut self, byte: u8) -> Result<(), BufferError> {
        self.pending.push(byte);
        self.source_col += 1;
        self.trailing_newline = false;
        if self.pending.len() == self.width {
            self.emit()?;
        }
        Ok(())
    }

    /// Append the pending bytes as the last row of the current source line
    fn emit(&mut self) -> Result<(), BufferError> {
        let tail = self.store.tail();
        if self.col_start != 0 {
            if let Some(tail) = tail {
                self.store.line_mut(tail).line_end = false;
            }
        }
        let content = std::mem::replace(&mut self.pending, Vec::with_capacity(self.width));
        self.store.insert_after(
            tail,
            DisplayLine::new(self.source_line, self.col_start, true, content),
        )?;
        self.col_start += self.width;
        Ok(())
    }

    fn finish(mut self) -> Result<(LineStore, bool), BufferError> {
        if !self.pending.is_empty() {
            self.emit()?;
        }
        if self.store.is_empty() {
            self.store = LineStore::with_empty_line(self.width);
        }
        Ok((self.store, self.trailing_newline))
    }
}

impl Buffer {
    /// Create a buffer holding `text`, wrapped at `display_width`
    pub fn from_text(display_width: usize, text: &str) -> Result<Self, BufferError> {
        let config = BufferConfig::default().with_display_width(display_width);
        Self::from_reader(config, text.as_bytes())
    }

    pub fn from_reader<R: Read>(config: BufferConfig, reader: R) -> Result<Self, BufferError> {
        let mut buffer = Self::with_config(config)?;
        buffer.load(reader)?;
        Ok(buffer)
    }

    /// Replace the contents with text read from `reader`.
    ///
    /// Tabs expand to spaces up to the next tab stop of the source line, and
    /// bytes outside the printable range are dropped. The current contents
    /// are kept if reading fails.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), BufferError> {
        let mut builder = LineBuilder::new(&self.config);
        let mut reader = BufReader::new(reader);
        let mut chunk = [0u8; 8192];
        loop {
            let read = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            for &byte in &chunk[..read] {
                builder.feed(byte)?;
            }
        }

        let (store, trailing_newline) = builder.finish()?;
        self.store = store;
        self.trailing_newline = trailing_newline;

        tracing::debug!(
            display_lines = self.store.len(),
            source_lines = self.source_line_count(),
            width = self.store.width(),
            "loaded buffer"
        );
        self.debug_validate();
        Ok(())
    }

    /// Write the contents to `writer`, one newline after each source line.
    /// The final source line gets one only if the buffer has a trailing
    /// newline.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<(), BufferError> {
        let last = self.store.len().saturating_sub(1);
        for (node, line) in self.store.iter() {
            writer.write_all(&line.content)?;
            if line.line_end && (node.index != last || self.trailing_newline) {
                writer.write_all(b"\n")?;
            }
        }
        writer.flush()?;
        tracing::debug!(display_lines = self.store.len(), "saved buffer");
        Ok(())
    }
}
