//! Traits for the external detector/tracker that feeds the pipeline.

use std::path::Path;

use ndarray::{Array2, ArrayView1};

use crate::trajectory::{Detection, FrameSize};

/// Stream properties of an opened medium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    pub frame_size: FrameSize,
    /// Frames per second; 0 when unknown
    pub fps: f64,
}

/// A detector/tracker that yields per-frame detections for one medium at
/// a time.
///
/// Implement this trait to connect any tracking engine to the pipeline.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use tracklabel_rs::{Detection, DetectionSource, FrameSize, MediaInfo};
///
/// struct MyTracker {
///     // Your decoder and model here
/// }
///
/// impl DetectionSource for MyTracker {
///     type Error = std::io::Error;
///
///     fn open(&mut self, path: &Path) -> Result<MediaInfo, Self::Error> {
///         Ok(MediaInfo { frame_size: FrameSize::new(1280, 720), fps: 30.0 })
///     }
///
///     fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error> {
///         Ok(None)
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for decoding or inference failures.
    type Error: std::error::Error;

    /// Open a medium and return its stream properties.
    ///
    /// An error here means the medium is unreadable; it is skipped.
    fn open(&mut self, path: &Path) -> Result<MediaInfo, Self::Error>;

    /// Detections of the next frame in frame order, or `None` at the end
    /// of the medium. Frames without detections return an empty batch.
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
///
/// Implement this for your tracker's output format to enable easy conversion.
pub trait IntoDetections {
    /// Convert the output of frame `frame_index` into detections.
    fn into_detections(self, frame_index: u32, frame_size: FrameSize) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self, _frame_index: u32, _frame_size: FrameSize) -> Vec<Detection> {
        self
    }
}

/// Box batch of one frame as trackers commonly return it: one XYWH pixel
/// row per object with parallel class, score and identity columns.
#[derive(Debug, Clone)]
pub struct FrameBoxes {
    /// Shape `(n, 4)`: center x, center y, width, height
    pub xywh: Array2<f32>,
    /// One per row; a batch with any other count is rejected
    pub class_ids: Vec<u32>,
    pub scores: Vec<f32>,
    /// `None` when the tracker has not assigned identities in this frame
    pub identities: Option<Vec<u64>>,
}

impl FrameBoxes {
    pub fn len(&self) -> usize {
        self.xywh.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.xywh.nrows() == 0
    }
}

fn xywh_row(row: ArrayView1<f32>) -> [f64; 4] {
    [row[0] as f64, row[1] as f64, row[2] as f64, row[3] as f64]
}

impl IntoDetections for FrameBoxes {
    fn into_detections(self, frame_index: u32, frame_size: FrameSize) -> Vec<Detection> {
        if self.xywh.ncols() < 4 {
            tracing::warn!(
                frame = frame_index,
                columns = self.xywh.ncols(),
                "Ignoring box batch with fewer than four columns"
            );
            return Vec::new();
        }
        if self.class_ids.len() != self.xywh.nrows() {
            tracing::warn!(
                frame = frame_index,
                rows = self.xywh.nrows(),
                class_ids = self.class_ids.len(),
                "Ignoring box batch whose class ids do not match its rows"
            );
            return Vec::new();
        }
        self.xywh
            .rows()
            .into_iter()
            .zip(self.class_ids.iter())
            .enumerate()
            .map(|(i, (row, &class_id))| {
                let identity = self.identities.as_ref().and_then(|ids| ids.get(i).copied());
                let score = self.scores.get(i).copied().unwrap_or(1.0);
                Detection::new(frame_index, identity, class_id, xywh_row(row), frame_size)
                    .with_score(score)
            })
            .collect()
    }
}
