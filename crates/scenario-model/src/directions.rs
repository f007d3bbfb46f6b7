//! Allowed movement directions.
//!
//! Serialized as a 4-element boolean array in `[up, down, left, right]`
//! order, matching the scenario file format.

use serde::{Deserialize, Serialize};

/// Which pointer directions count toward measured speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[bool; 4]", into = "[bool; 4]")]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    /// Every direction enabled.
    pub const ALL: Directions = Directions {
        up: true,
        down: true,
        left: true,
        right: true,
    };

    /// Nothing enabled; all movement is invisible.
    pub const NONE: Directions = Directions {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Left and right only.
    pub const HORIZONTAL: Directions = Directions {
        up: false,
        down: false,
        left: true,
        right: true,
    };

    /// Up and down only.
    pub const VERTICAL: Directions = Directions {
        up: true,
        down: true,
        left: false,
        right: false,
    };

    pub fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// Flags in `[up, down, left, right]` order.
    pub fn as_array(&self) -> [bool; 4] {
        [self.up, self.down, self.left, self.right]
    }

    /// Number of enabled directions.
    pub fn count(&self) -> usize {
        self.as_array().iter().filter(|enabled| **enabled).count()
    }

    /// Short glyph used in generated scenario names.
    ///
    /// `✥` for all four, `Ø` for none, `↔`/`↕` for pure horizontal or
    /// vertical, otherwise the enabled arrows in up/down/left/right order.
    pub fn glyph(&self) -> String {
        match *self {
            Self::ALL => "✥".to_string(),
            Self::NONE => "Ø".to_string(),
            Self::HORIZONTAL => "↔".to_string(),
            Self::VERTICAL => "↕".to_string(),
            _ => {
                let mut glyph = String::new();
                if self.up {
                    glyph.push('↑');
                }
                if self.down {
                    glyph.push('↓');
                }
                if self.left {
                    glyph.push('←');
                }
                if self.right {
                    glyph.push('→');
                }
                glyph
            }
        }
    }
}

impl Default for Directions {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<[bool; 4]> for Directions {
    fn from([up, down, left, right]: [bool; 4]) -> Self {
        Self::new(up, down, left, right)
    }
}

impl From<Directions> for [bool; 4] {
    fn from(directions: Directions) -> Self {
        directions.as_array()
    }
}
