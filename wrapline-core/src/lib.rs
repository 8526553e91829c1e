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

//! Wrapped line buffer.
//!
//! A text file is held as a doubly-linked sequence of fixed-width display
//! lines. Each display line records the source line it belongs to and the
//! source column its content starts at, so that edits addressed in either
//! display or source coordinates can be applied incrementally and the wrapped
//! partition re-flowed locally instead of being recomputed.

use slotmap::new_key_type;

pub mod buffer;
pub mod config;
pub mod coords;
pub mod document;
pub mod error;
pub mod file_io;
pub mod integrity;
pub mod line;
mod mutate;
mod rewrap;
pub mod store;

new_key_type! {
    /// Stable handle of a display-line node inside the line store.
    pub struct NodeId;
}

pub use buffer::Buffer;
pub use config::BufferConfig;
pub use coords::{DisplayPos, SourceCol, SourcePos};
pub use document::{Document, DocumentStatus};
pub use error::BufferError;
pub use integrity::IntegrityError;
pub use line::DisplayLine;
pub use store::NodeRef;
