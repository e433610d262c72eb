//! Vertical rhythm and line measure for terminal output.
//!
//! A [`Typography`] is built once from configuration and passed to the
//! renderers; nothing here is global.

use crate::viewport::Dimensions;
use serde::{Deserialize, Serialize};

/// Narrowest column we lay text into.
const MIN_WIDTH: usize = 16;

/// Spacing and measure settings, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    /// Columns per rhythm unit.
    #[serde(default = "default_rhythm_unit")]
    pub rhythm_unit: f32,

    /// Maximum line length, in rhythm units.
    #[serde(default = "default_max_width_rhythms")]
    pub max_width_rhythms: f32,

    /// Left and right padding, in rhythm units.
    #[serde(default = "default_gutter_rhythms")]
    pub gutter_rhythms: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            rhythm_unit: default_rhythm_unit(),
            max_width_rhythms: default_max_width_rhythms(),
            gutter_rhythms: default_gutter_rhythms(),
        }
    }
}

fn default_rhythm_unit() -> f32 {
    3.0
}

fn default_max_width_rhythms() -> f32 {
    24.0
}

fn default_gutter_rhythms() -> f32 {
    0.75
}

/// Resolved measurements for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Usable line length.
    pub width: usize,
    /// Left padding.
    pub indent: usize,
    /// Visible rows; 0 when unknown.
    pub height: usize,
}

impl Layout {
    pub fn pad(&self) -> String {
        " ".repeat(self.indent)
    }
}

impl Typography {
    /// `n` rhythm units, in cells.
    pub fn rhythm(&self, n: f32) -> usize {
        (n * self.rhythm_unit).round().max(0.0) as usize
    }

    pub fn max_width(&self) -> usize {
        self.rhythm(self.max_width_rhythms).max(MIN_WIDTH)
    }

    /// Fit the measure to a viewport. A zero-width viewport (no terminal)
    /// gets the full measure.
    pub fn layout(&self, viewport: Dimensions) -> Layout {
        let indent = self.rhythm(self.gutter_rhythms);
        let available = usize::from(viewport.width);
        let width = if available == 0 {
            self.max_width()
        } else {
            available
                .saturating_sub(indent * 2)
                .min(self.max_width())
                .max(MIN_WIDTH)
        };

        Layout {
            width,
            indent,
            height: usize::from(viewport.height),
        }
    }
}
