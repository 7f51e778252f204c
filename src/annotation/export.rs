//! Conversion of reviewed annotations to per-frame training labels.
//!
//! Each label is one line of `<class id> <center x> <center y> <width>
//! <height>`, coordinates normalized to `[0, 1]`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::annotation::document::ResultSet;
use crate::annotation::region::Region;
use crate::trajectory::PercentRect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloLabel {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloLabel {
    pub fn from_percent(class_id: u32, rect: PercentRect) -> Self {
        let [x_center, y_center, width, height] = rect.to_normalized_center();
        Self {
            class_id,
            x_center,
            y_center,
            width,
            height,
        }
    }
}

impl fmt::Display for YoloLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Collect labels per 0-based frame from every labelled box track.
///
/// Tracks without a label, with a label missing from `class_ids`, and
/// disabled keyframes are skipped.
pub fn frame_labels(
    result_sets: &[ResultSet],
    class_ids: &HashMap<String, u32>,
) -> BTreeMap<u32, Vec<YoloLabel>> {
    let mut frames: BTreeMap<u32, Vec<YoloLabel>> = BTreeMap::new();

    for region in result_sets.iter().flat_map(|set| &set.result) {
        let Region::VideoRectangle { value, .. } = region else {
            continue;
        };
        let Some(class_id) = value.labels.first().and_then(|name| class_ids.get(name)) else {
            continue;
        };
        for sample in value.sequence.iter().filter(|s| s.enabled) {
            let Some(frame) = sample.frame_index.checked_sub(1) else {
                continue;
            };
            frames
                .entry(frame)
                .or_default()
                .push(YoloLabel::from_percent(*class_id, sample.rect()));
        }
    }

    frames
}

/// Collect labels from still-image boxes.
pub fn image_labels(result_sets: &[ResultSet], class_ids: &HashMap<String, u32>) -> Vec<YoloLabel> {
    result_sets
        .iter()
        .flat_map(|set| &set.result)
        .filter_map(|region| match region {
            Region::RectangleLabels { value, .. } => {
                let class_id = value.rectanglelabels.first().and_then(|n| class_ids.get(n))?;
                let rect = PercentRect {
                    x: value.x,
                    y: value.y,
                    width: value.width,
                    height: value.height,
                };
                Some(YoloLabel::from_percent(*class_id, rect))
            }
            _ => None,
        })
        .collect()
}

/// Render labels as the lines of one label file.
pub fn to_lines(labels: &[YoloLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
