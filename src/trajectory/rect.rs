//! Bounding boxes in pixel and percentage space.
//!
//! Detectors report boxes in pixels using the center convention
//! (center x, center y, width, height). The annotation tool renders from
//! the top-left corner and size expressed as percentages of the frame.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are non-zero.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Pixel-space bounding box stored as top-left corner plus size (TLWH).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f64,
    /// Top-left y coordinate
    pub y: f64,
    /// Width of the bounding box
    pub width: f64,
    /// Height of the bounding box
    pub height: f64,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from XYWH format (center x, center y, width, height).
    #[inline]
    pub fn from_xywh(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to XYWH format: (center_x, center_y, width, height).
    #[inline]
    pub fn to_xywh(&self) -> [f64; 4] {
        let (cx, cy) = self.center();
        [cx, cy, self.width, self.height]
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f64; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Express this box as percentages of `frame`.
    ///
    /// The caller must ensure `frame.is_valid()`; zero dimensions yield
    /// non-finite values.
    #[inline]
    pub fn to_percent(&self, frame: FrameSize) -> PercentRect {
        let (fw, fh) = (frame.width as f64, frame.height as f64);
        PercentRect {
            x: self.x / fw * 100.0,
            y: self.y / fh * 100.0,
            width: self.width / fw * 100.0,
            height: self.height / fh * 100.0,
        }
    }
}

/// Box in percentage space: top-left corner and size, each in `[0, 100]`
/// for boxes that lie inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    /// Map back to a pixel box in `frame`.
    #[inline]
    pub fn to_pixel(&self, frame: FrameSize) -> Rect {
        let [cx, cy, w, h] = to_pixel(self, frame.width as f64, frame.height as f64);
        Rect::from_xywh(cx, cy, w, h)
    }

    /// Center and size normalized to `[0, 1]`: (center_x, center_y, width, height).
    #[inline]
    pub fn to_normalized_center(&self) -> [f64; 4] {
        [
            (self.x + self.width / 2.0) / 100.0,
            (self.y + self.height / 2.0) / 100.0,
            self.width / 100.0,
            self.height / 100.0,
        ]
    }
}

/// Convert a center-convention pixel box to the top-left percentage convention.
pub fn to_percent(
    center_x: f64,
    center_y: f64,
    width: f64,
    height: f64,
    frame_width: f64,
    frame_height: f64,
) -> PercentRect {
    PercentRect {
        x: (center_x - width / 2.0) / frame_width * 100.0,
        y: (center_y - height / 2.0) / frame_height * 100.0,
        width: width / frame_width * 100.0,
        height: height / frame_height * 100.0,
    }
}

/// Inverse of [`to_percent`]: returns (center_x, center_y, width, height) in pixels.
pub fn to_pixel(rect: &PercentRect, frame_width: f64, frame_height: f64) -> [f64; 4] {
    let width = rect.width / 100.0 * frame_width;
    let height = rect.height / 100.0 * frame_height;
    let x = rect.x / 100.0 * frame_width;
    let y = rect.y / 100.0 * frame_height;
    [x + width / 2.0, y + height / 2.0, width, height]
}
