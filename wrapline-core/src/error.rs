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

use thiserror::Error;

/// Errors returned by the line buffer and the document around it.
///
/// `InvalidArgs` and `InvalidCharacter` are reported before anything is
/// mutated. `Internal` means the structure reached a state that argument
/// validation should have made impossible; the buffer should not be edited
/// further after seeing one. `Io` comes only from load and save.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("invalid character 0x{0:02x}")]
    InvalidCharacter(u8),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BufferError {
    pub(crate) fn invalid_args(msg: impl Into<String>) -> Self {
        BufferError::InvalidArgs(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        BufferError::Internal(msg.into())
    }

    /// True for errors after which the buffer is still consistent.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BufferError::Internal(_))
    }
}
