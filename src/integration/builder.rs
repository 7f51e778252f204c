//! Builder for creating Detection objects from various input formats.

use crate::trajectory::{Detection, FrameSize, Rect};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone)]
pub struct DetectionBuilder {
    frame_index: u32,
    identity: Option<u64>,
    class_id: u32,
    bbox: Rect,
    frame_size: FrameSize,
    score: f32,
}

impl Default for DetectionBuilder {
    fn default() -> Self {
        Self {
            frame_index: 0,
            identity: None,
            class_id: 0,
            bbox: Rect::default(),
            frame_size: FrameSize::default(),
            score: 1.0,
        }
    }
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 0-based frame index.
    pub fn frame(mut self, frame_index: u32) -> Self {
        self.frame_index = frame_index;
        self
    }

    /// Set the tracker identity.
    pub fn identity(mut self, identity: u64) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set the pixel dimensions of the source frame.
    pub fn frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_size = FrameSize::new(width, height);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f64, cy: f64, w: f64, h: f64) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f64, t: f64, w: f64, h: f64) -> Self {
        self.bbox = Rect::new(l, t, w, h);
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection {
            frame_index: self.frame_index,
            identity: self.identity,
            class_id: self.class_id,
            bbox: self.bbox,
            frame_size: self.frame_size,
            score: self.score,
        }
    }
}
