use serde::{Deserialize, Serialize};

use crate::color::ColorMode;

/// Options controlling MDX rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Target encoding for legend color stops.
    pub color_mode: ColorMode,
    /// Marker character for list items.
    pub list_marker: char,
    /// Escape Markdown special characters in run text.
    pub escape_special_chars: bool,
    /// Prepend a summary block of spatial/temporal descriptors to the body.
    pub include_summary: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            color_mode: ColorMode::default(),
            list_marker: '-',
            escape_special_chars: true,
            include_summary: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    pub fn with_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let options = RenderOptions::new()
            .with_color_mode(ColorMode::Rgb)
            .with_escaping(false)
            .with_summary(false);
        assert_eq!(options.color_mode, ColorMode::Rgb);
        assert!(!options.escape_special_chars);
        assert!(!options.include_summary);
        assert_eq!(options.list_marker, '-');
    }
}
