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

//! A buffer bound to a file on disk, with its save status.

use crate::buffer::Buffer;
use crate::config::BufferConfig;
use crate::coords::SourceCol;
use crate::error::BufferError;
use std::path::{Path, PathBuf};

/// Save status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Never saved and not backed by a file
    New,
    /// Matches what was last read from or written to disk
    Saved,
    /// Edited since the last load or save
    Modified,
}

/// One open file: its line buffer, where it lives and whether it is dirty.
///
/// File access is async; the buffer underneath is not, so every edit is a
/// plain synchronous call.
#[derive(Debug)]
pub struct Document {
    buffer: Buffer,
    path: Option<PathBuf>,
    status: DocumentStatus,
}

impl Document {
    /// A scratch document with no backing file
    pub fn new(config: BufferConfig) -> Result<Self, BufferError> {
        Ok(Self {
            buffer: Buffer::with_config(config)?,
            path: None,
            status: DocumentStatus::New,
        })
    }

    /// Read `path` into a new document
    pub async fn open(path: impl AsRef<Path>, config: BufferConfig) -> Result<Self, BufferError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let buffer = Buffer::from_reader(config, content.as_slice())?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "opened document");
        Ok(Self {
            buffer,
            path: Some(path.to_path_buf()),
            status: DocumentStatus::Saved,
        })
    }

    /// Write the buffer back to its file
    pub async fn save(&mut self) -> Result<(), BufferError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| BufferError::invalid_args("document has no file path"))?;
        self.write_to(&path).await
    }

    /// Write the buffer to `path` and make that the document's file
    pub async fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), BufferError> {
        let path = path.as_ref().to_path_buf();
        self.write_to(&path).await?;
        self.path = Some(path);
        Ok(())
    }

    /// Discard edits and re-read the document's file
    pub async fn reload(&mut self) -> Result<(), BufferError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| BufferError::invalid_args("document has no file path"))?;
        let content = tokio::fs::read(&path).await?;
        self.buffer.load(content.as_slice())?;
        self.status = DocumentStatus::Saved;
        Ok(())
    }

    async fn write_to(&mut self, path: &Path) -> Result<(), BufferError> {
        let mut content = Vec::new();
        self.buffer.save(&mut content)?;
        tokio::fs::write(path, &content).await?;
        self.status = DocumentStatus::Saved;
        tracing::debug!(path = %path.display(), bytes = content.len(), "saved document");
        Ok(())
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn is_modified(&self) -> bool {
        self.status == DocumentStatus::Modified
    }

    pub fn insert_char(&mut self, row: usize, col: usize, ch: u8) -> Result<(), BufferError> {
        let result = self.buffer.insert_char(row, col, ch);
        self.record("insert_char", result)
    }

    pub fn delete_char(&mut self, row: usize, col: usize) -> Result<(), BufferError> {
        let result = self.buffer.delete_char(row, col);
        self.record("delete_char", result)
    }

    pub fn delete_line_break(&mut self, row: usize) -> Result<(), BufferError> {
        let result = self.buffer.delete_line_break(row);
        self.record("delete_line_break", result)
    }

    pub fn insert_at(
        &mut self,
        source_line: usize,
        source_col: usize,
        ch: u8,
    ) -> Result<(), BufferError> {
        let result = self.buffer.insert_at(source_line, source_col, ch);
        self.record("insert_at", result)
    }

    pub fn delete_at(&mut self, source_line: usize, source_col: usize) -> Result<(), BufferError> {
        let result = self.buffer.delete_at(source_line, source_col);
        self.record("delete_at", result)
    }

    pub fn join_lines(&mut self, source_line: usize) -> Result<(), BufferError> {
        let result = self.buffer.join_lines(source_line);
        self.record("join_lines", result)
    }

    /// Insert every byte of `text` starting at a source position.
    /// Stops at the first rejected byte; earlier bytes stay inserted.
    pub fn insert_str(
        &mut self,
        source_line: usize,
        source_col: usize,
        text: &str,
    ) -> Result<(), BufferError> {
        let (mut line, mut col) = (source_line, source_col);
        for &byte in text.as_bytes() {
            self.insert_at(line, col, byte)?;
            if byte == b'\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        Ok(())
    }

    /// Rewrap to a new width. Layout only, so the status is unchanged.
    pub fn resize_columns(&mut self, new_width: usize) -> Result<(), BufferError> {
        self.buffer.resize_columns(new_width)
    }

    pub fn set_cursor_hint(&mut self, index: usize) -> Result<(), BufferError> {
        self.buffer.set_cursor_hint(index)
    }

    pub fn display_coords(
        &self,
        source_line: usize,
        source_col: SourceCol,
    ) -> Result<crate::coords::DisplayPos, BufferError> {
        self.buffer.get_display_coords(source_line, source_col)
    }

    fn record(&mut self, op: &str, result: Result<(), BufferError>) -> Result<(), BufferError> {
        match &result {
            Ok(()) => self.status = DocumentStatus::Modified,
            Err(err) => tracing::warn!(op, %err, "edit rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn narrow() -> BufferConfig {
        BufferConfig::default().with_display_width(4)
    }

    #[test]
    fn test_new_document() {
        let doc = Document::new(narrow()).unwrap();
        assert_eq!(doc.status(), DocumentStatus::New);
        assert!(doc.path().is_none());
        assert_eq!(doc.buffer().line_count(), 1);
    }

    #[test]
    fn test_edits_mark_modified() {
        let mut doc = Document::new(narrow()).unwrap();
        doc.insert_str(0, 0, "hello\nworld").unwrap();
        assert!(doc.is_modified());
        assert_eq!(doc.buffer().to_text(), "hello\nworld\n");
        assert_eq!(doc.buffer().source_line_count(), 2);
    }

    #[test]
    fn test_rejected_edit_keeps_status() {
        let mut doc = Document::new(narrow()).unwrap();
        assert!(doc.insert_char(0, 0, 0x07).is_err());
        assert!(doc.delete_char(0, 0).is_err());
        assert_eq!(doc.status(), DocumentStatus::New);
    }

    #[test]
    fn test_resize_does_not_modify() {
        let mut doc = Document::new(narrow()).unwrap();
        doc.resize_columns(2).unwrap();
        assert_eq!(doc.status(), DocumentStatus::New);
        assert_eq!(doc.buffer().display_width(), 2);
    }

    #[tokio::test]
    async fn test_save_without_path_fails() {
        let mut doc = Document::new(narrow()).unwrap();
        let err = doc.save().await.unwrap_err();
        assert!(matches!(err, BufferError::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn test_open_edit_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "abcdefg\nhi").unwrap();

        let mut doc = Document::open(&path, narrow()).await.unwrap();
        assert_eq!(doc.status(), DocumentStatus::Saved);
        assert_eq!(doc.buffer().line_count(), 3);

        doc.join_lines(0).unwrap();
        assert!(doc.is_modified());
        doc.save().await.unwrap();
        assert_eq!(doc.status(), DocumentStatus::Saved);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abcdefghi");
    }

    #[tokio::test]
    async fn test_save_as_sets_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let mut doc = Document::new(narrow()).unwrap();
        doc.insert_str(0, 0, "abc").unwrap();
        doc.save_as(&path).await.unwrap();
        assert_eq!(doc.path(), Some(path.as_path()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc\n");
    }

    #[tokio::test]
    async fn test_reload_discards_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        let mut doc = Document::open(&path, narrow()).await.unwrap();
        doc.delete_at(0, 0).unwrap();
        doc.reload().await.unwrap();
        assert_eq!(doc.status(), DocumentStatus::Saved);
        assert_eq!(doc.buffer().to_text(), "one\ntwo\n");
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Document::open(dir.path().join("missing"), narrow())
            .await
            .unwrap_err();
        assert!(matches!(err, BufferError::Io(_)));
    }
}
