//! Builds annotation documents from classified trajectories.

use std::path::PathBuf;

use crate::annotation::document::{AnnotationDocument, ResultSet};
use crate::annotation::ids::RegionIds;
use crate::annotation::media::media_url;
use crate::annotation::region::{RectangleValue, Region, SequenceValue};
use crate::config::{ClassMap, EmptyMediumPolicy, MediaKind, PipelineConfig};
use crate::error::Result;
use crate::trajectory::{AggregationStats, ClassifiedTrajectory, Detection, FrameSize, Ingest};

/// Source metadata of one medium.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMeta {
    pub path: PathBuf,
    pub frame_size: FrameSize,
}

pub struct AnnotationSerializer<'a> {
    config: &'a PipelineConfig,
}

impl<'a> AnnotationSerializer<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Emit one shape/label record pair per non-empty trajectory.
    ///
    /// Returns `Ok(None)` when nothing survived and the empty-medium policy
    /// is [`EmptyMediumPolicy::Skip`].
    pub fn serialize_video(
        &self,
        trajectories: Vec<ClassifiedTrajectory>,
        media: &MediaMeta,
    ) -> Result<Option<AnnotationDocument>> {
        let url = self.url(media)?;
        let target = MediaKind::Video.target();
        let mut ids = RegionIds::new(self.config.region_ids);
        let mut result = Vec::with_capacity(trajectories.len() * 2);

        for ClassifiedTrajectory {
            trajectory, label, ..
        } in trajectories
        {
            if trajectory.is_empty() {
                continue;
            }
            let id = ids.next_id();
            let sequence = trajectory.samples;

            result.push(Region::VideoRectangle {
                id: id.clone(),
                from_name: self.config.from_names.shape.clone(),
                to_name: target.to_string(),
                value: SequenceValue {
                    labels: vec![label.clone()],
                    sequence: sequence.clone(),
                    original_width: media.frame_size.width,
                    original_height: media.frame_size.height,
                },
            });
            result.push(Region::Labels {
                id,
                from_name: self.config.from_names.label.clone(),
                to_name: target.to_string(),
                value: SequenceValue {
                    labels: vec![label],
                    sequence,
                    original_width: media.frame_size.width,
                    original_height: media.frame_size.height,
                },
            });
        }

        tracing::debug!(
            medium = %media.path.display(),
            regions = result.len(),
            "Serialized trajectories"
        );
        Ok(self.finish(MediaKind::Video, url, result))
    }

    /// Emit one `rectanglelabels` region per mapped detection of a still image.
    ///
    /// Every detection is recorded in `stats`: a kept box counts as a
    /// sample, dropped ones under their drop reason.
    pub fn serialize_image(
        &self,
        detections: Vec<Detection>,
        media: &MediaMeta,
        stats: &mut AggregationStats,
    ) -> Result<Option<AnnotationDocument>> {
        let url = self.url(media)?;
        let target = MediaKind::Image.target();
        let mut ids = RegionIds::new(self.config.region_ids);
        let mut result = Vec::with_capacity(detections.len());

        for det in detections {
            let Some(label) = image_label(self.config.class_map.as_ref(), det.class_id) else {
                tracing::debug!(
                    medium = %media.path.display(),
                    class_id = det.class_id,
                    "Dropping box with unmapped class"
                );
                stats.record(Ingest::UnmappedClass);
                continue;
            };
            if !det.frame_size.is_valid() {
                tracing::warn!(
                    medium = %media.path.display(),
                    width = det.frame_size.width,
                    height = det.frame_size.height,
                    "Dropping box with zero-sized frame"
                );
                stats.record(Ingest::InvalidFrame);
                continue;
            }
            let rect = det.bbox.to_percent(det.frame_size);
            result.push(Region::RectangleLabels {
                id: ids.next_id(),
                from_name: self.config.from_names.rectangle.clone(),
                to_name: target.to_string(),
                value: RectangleValue {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    rotation: 0.0,
                    rectanglelabels: vec![label],
                },
                score: Some(det.score),
            });
            stats.record(Ingest::Started);
        }

        Ok(self.finish(MediaKind::Image, url, result))
    }

    fn url(&self, media: &MediaMeta) -> Result<String> {
        media_url(&self.config.url_prefix, &self.config.media_root, &media.path)
    }

    fn finish(
        &self,
        kind: MediaKind,
        url: String,
        result: Vec<Region>,
    ) -> Option<AnnotationDocument> {
        if result.is_empty() && self.config.empty_media == EmptyMediumPolicy::Skip {
            return None;
        }
        let results = ResultSet {
            model_version: self.config.model_version.clone(),
            score: self.config.prediction_score,
            result,
        };
        Some(AnnotationDocument::new(
            kind.target(),
            url,
            self.config.envelope,
            results,
        ))
    }
}

fn image_label(class_map: Option<&ClassMap>, class_id: u32) -> Option<String> {
    match class_map {
        Some(map) => map.label(class_id).map(str::to_string),
        None => Some(class_id.to_string()),
    }
}
