//! Classification of a measured speed against the target band.

use serde::Serialize;

/// Where a speed sits relative to `[target - tolerance, target + tolerance]`.
///
/// The band is inclusive on both edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ZoneStatus {
    Perfect,
    /// Below the band; `deficit` is `speed - min` and therefore negative.
    Low { deficit: f64 },
    /// Above the band; `excess` is `speed - max` and therefore positive.
    High { excess: f64 },
}

impl ZoneStatus {
    pub fn classify(speed: f64, target: f64, tolerance: f64) -> Self {
        let min_zone = target - tolerance;
        let max_zone = target + tolerance;

        if speed < min_zone {
            Self::Low {
                deficit: speed - min_zone,
            }
        } else if speed > max_zone {
            Self::High {
                excess: speed - max_zone,
            }
        } else {
            Self::Perfect
        }
    }

    /// Signed distance from the nearest band edge, `0.0` when perfect.
    pub fn diff(&self) -> f64 {
        match *self {
            Self::Perfect => 0.0,
            Self::Low { deficit } => deficit,
            Self::High { excess } => excess,
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self, Self::Perfect)
    }

    pub fn color(&self) -> StatusColor {
        match self {
            Self::Perfect => StatusColor::PERFECT,
            Self::Low { .. } => StatusColor::SLOW,
            Self::High { .. } => StatusColor::FAST,
        }
    }

    /// Short uppercase label for text output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Perfect => "PERFECT",
            Self::Low { .. } => "LOW",
            Self::High { .. } => "HIGH",
        }
    }
}

/// RGB color attached to graph points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StatusColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl StatusColor {
    /// Gold.
    pub const PERFECT: StatusColor = StatusColor::rgb(255, 215, 0);
    /// Blue.
    pub const SLOW: StatusColor = StatusColor::rgb(50, 150, 255);
    /// Red.
    pub const FAST: StatusColor = StatusColor::rgb(255, 50, 50);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
