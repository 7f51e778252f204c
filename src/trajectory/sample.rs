use serde::{Deserialize, Serialize};

use crate::trajectory::rect::PercentRect;

/// One keyframe of a trajectory in percentage space.
///
/// Field names follow the annotation tool's `sequence` entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// 1-based frame number
    #[serde(rename = "frame")]
    pub frame_index: u32,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub rotation: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Seconds from the start of the medium
    #[serde(rename = "time", default)]
    pub time_seconds: f64,
}

fn enabled_default() -> bool {
    true
}

impl FrameSample {
    /// Build the sample for a detection seen at 0-based `frame_index`.
    pub fn from_detection_frame(frame_index: u32, rect: PercentRect, fps: f64) -> Self {
        let time_seconds = if fps > 0.0 {
            frame_index as f64 / fps
        } else {
            0.0
        };
        Self {
            frame_index: frame_index.saturating_add(1),
            enabled: true,
            rotation: 0.0,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            time_seconds,
        }
    }

    pub fn rect(&self) -> PercentRect {
        PercentRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}
