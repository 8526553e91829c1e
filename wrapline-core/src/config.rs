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

//! Buffer configuration.

use crate::error::BufferError;

/// Columns per display line when nothing else is configured
pub const DEFAULT_DISPLAY_WIDTH: usize = 80;

/// Tab stop used when expanding tabs on load
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Configuration for a line buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Number of columns in each display line
    pub display_width: usize,
    /// Distance between tab stops when loading text
    pub tab_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            display_width: DEFAULT_DISPLAY_WIDTH,
            tab_size: DEFAULT_TAB_SIZE,
        }
    }
}

impl BufferConfig {
    pub fn new(display_width: usize, tab_size: usize) -> Result<Self, BufferError> {
        let config = Self {
            display_width,
            tab_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set the display width
    pub fn with_display_width(mut self, display_width: usize) -> Self {
        self.display_width = display_width;
        self
    }

    /// Builder method to set the tab stop
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    pub fn validate(&self) -> Result<(), BufferError> {
        if self.display_width == 0 {
            return Err(BufferError::invalid_args("display width must be positive"));
        }
        if self.tab_size == 0 {
            return Err(BufferError::invalid_args("tab size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BufferConfig::default();
        assert_eq!(config.display_width, 80);
        assert_eq!(config.tab_size, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(BufferConfig::new(0, 4).is_err());
        assert!(BufferConfig::new(10, 0).is_err());
        assert!(BufferConfig::default().with_display_width(0).validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = BufferConfig::default().with_display_width(3).with_tab_size(8);
        assert_eq!(config, BufferConfig::new(3, 8).unwrap());
    }
}
