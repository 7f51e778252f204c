//! Per-frame detection input for the aggregator.

use crate::trajectory::rect::{FrameSize, Rect};

/// A single detected object in one frame, as produced by the external
/// detector/tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// 0-based index of the frame in the medium
    pub frame_index: u32,
    /// Tracker identity; `None` for untracked detections
    pub identity: Option<u64>,
    /// Detector class id
    pub class_id: u32,
    /// Bounding box in pixels (TLWH)
    pub bbox: Rect,
    /// Pixel dimensions of the source frame
    pub frame_size: FrameSize,
    /// Detection confidence score
    pub score: f32,
}

impl Detection {
    /// Create a detection from a center-convention pixel box.
    pub fn new(
        frame_index: u32,
        identity: Option<u64>,
        class_id: u32,
        xywh: [f64; 4],
        frame_size: FrameSize,
    ) -> Self {
        Self {
            frame_index,
            identity,
            class_id,
            bbox: Rect::from_xywh(xywh[0], xywh[1], xywh[2], xywh[3]),
            frame_size,
            score: 1.0,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }
}
