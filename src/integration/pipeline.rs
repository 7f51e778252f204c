//! AnnotationPipeline for turning detection streams into annotation documents.

use std::path::{Path, PathBuf};

use crate::annotation::{AnnotationDocument, AnnotationSerializer, MediaMeta};
use crate::config::{MediaKind, PipelineConfig};
use crate::error::{Error, Result};
use crate::trajectory::{AggregationStats, BehaviorClassifier, Detection, TrajectoryAggregator};

use super::{DetectionSource, MediaInfo};

/// A medium that produced no document because of an error.
#[derive(Debug)]
pub struct SkippedMedium {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of [`AnnotationPipeline::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    pub documents: Vec<AnnotationDocument>,
    pub skipped: Vec<SkippedMedium>,
    /// Media without trajectories left out by
    /// [`EmptyMediumPolicy::Skip`](crate::config::EmptyMediumPolicy::Skip)
    pub omitted: Vec<PathBuf>,
    /// Detection counters summed over every processed medium
    pub stats: AggregationStats,
}

/// Drives a `DetectionSource` through aggregation, classification and
/// serialization, one medium at a time.
pub struct AnnotationPipeline<D: DetectionSource> {
    source: D,
    config: PipelineConfig,
}

impl<D: DetectionSource> AnnotationPipeline<D> {
    /// Create a pipeline; an invalid configuration is rejected here.
    pub fn new(source: D, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// Create a pipeline with the default configuration.
    pub fn with_default_config(source: D) -> Self {
        Self {
            source,
            config: PipelineConfig::default(),
        }
    }

    /// Process one medium.
    ///
    /// `Ok(None)` means the medium had nothing to annotate and the
    /// configuration skips such media. Any error only concerns this
    /// medium; partially aggregated trajectories are discarded.
    pub fn process_medium(&mut self, path: &Path) -> Result<Option<AnnotationDocument>> {
        self.annotate(path).map(|(document, _)| document)
    }

    /// Process media sequentially. Failures are logged and reported
    /// instead of aborting the run.
    pub fn run<I, P>(&mut self, media: I) -> RunReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = RunReport::default();
        for path in media {
            let path = path.as_ref();
            match self.annotate(path) {
                Ok((document, stats)) => {
                    report.stats.merge(&stats);
                    match document {
                        Some(document) => report.documents.push(document),
                        None => report.omitted.push(path.to_path_buf()),
                    }
                }
                Err(error) => {
                    tracing::warn!(medium = %path.display(), error = %error, "Skipping medium");
                    report.skipped.push(SkippedMedium {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }
        tracing::info!(
            documents = report.documents.len(),
            skipped = report.skipped.len(),
            omitted = report.omitted.len(),
            dropped_detections = report.stats.dropped(),
            "Annotation run complete"
        );
        report
    }

    fn annotate(&mut self, path: &Path) -> Result<(Option<AnnotationDocument>, AggregationStats)> {
        let info = self.source.open(path).map_err(|e| unreadable(path, e))?;
        if !info.frame_size.is_valid() {
            return Err(Error::InvalidFrameSize {
                width: info.frame_size.width,
                height: info.frame_size.height,
            });
        }
        let media = MediaMeta {
            path: path.to_path_buf(),
            frame_size: info.frame_size,
        };

        match self.config.media_kind {
            MediaKind::Video => self.annotate_video(&media, info),
            MediaKind::Image => self.annotate_image(&media, info),
        }
    }

    fn annotate_video(
        &mut self,
        media: &MediaMeta,
        info: MediaInfo,
    ) -> Result<(Option<AnnotationDocument>, AggregationStats)> {
        tracing::info!(medium = %media.path.display(), fps = info.fps, "Tracking medium");

        let mut aggregator = TrajectoryAggregator::new(self.config.class_map.as_ref(), info.fps);
        while let Some(batch) = self
            .source
            .next_frame()
            .map_err(|e| unreadable(&media.path, e))?
        {
            aggregator.push_frame(batch.into_iter().map(|det| inherit_frame_size(det, info)));
        }
        let aggregation = aggregator.finish();

        tracing::info!(
            medium = %media.path.display(),
            trajectories = aggregation.trajectories.len(),
            frames = aggregation.stats.frames,
            untracked = aggregation.stats.untracked,
            unmapped = aggregation.stats.unmapped_class,
            "Aggregated trajectories"
        );

        let classifier = BehaviorClassifier::new(self.config.movement_sensitivity);
        let classified = classifier.classify_all(
            aggregation.trajectories,
            self.config.label_source,
            &self.config.fallback_label,
        );
        let document = AnnotationSerializer::new(&self.config).serialize_video(classified, media)?;
        Ok((document, aggregation.stats))
    }

    fn annotate_image(
        &mut self,
        media: &MediaMeta,
        info: MediaInfo,
    ) -> Result<(Option<AnnotationDocument>, AggregationStats)> {
        let detections = self
            .source
            .next_frame()
            .map_err(|e| unreadable(&media.path, e))?
            .unwrap_or_default();

        let mut stats = AggregationStats {
            frames: 1,
            ..Default::default()
        };
        let detections = detections
            .into_iter()
            .map(|det| inherit_frame_size(det, info))
            .collect();
        let document = AnnotationSerializer::new(&self.config).serialize_image(
            detections,
            media,
            &mut stats,
        )?;
        Ok((document, stats))
    }

    /// Get a reference to the underlying detection source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Get a mutable reference to the underlying detection source.
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

fn unreadable<E: std::error::Error>(path: &Path, error: E) -> Error {
    Error::UnreadableMedium {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// Detections without their own frame size take the medium's.
fn inherit_frame_size(mut det: Detection, info: MediaInfo) -> Detection {
    if !det.frame_size.is_valid() {
        det.frame_size = info.frame_size;
    }
    det
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::DetectionBuilder;
    use crate::trajectory::FrameSize;
    use std::collections::VecDeque;

    #[derive(Debug, thiserror::Error)]
    #[error("decoder failed")]
    struct DecodeError;

    struct MockSource {
        frames: VecDeque<Vec<Detection>>,
    }

    impl DetectionSource for MockSource {
        type Error = DecodeError;

        fn open(&mut self, _path: &Path) -> std::result::Result<MediaInfo, Self::Error> {
            Ok(MediaInfo {
                frame_size: FrameSize::new(640, 480),
                fps: 30.0,
            })
        }

        fn next_frame(&mut self) -> std::result::Result<Option<Vec<Detection>>, Self::Error> {
            Ok(self.frames.pop_front())
        }
    }

    #[test]
    fn test_annotation_pipeline() {
        let frames = (0..3)
            .map(|f| {
                vec![
                    DetectionBuilder::new()
                        .frame(f)
                        .identity(1)
                        .xywh(100.0 + 50.0 * f as f64, 100.0, 20.0, 20.0)
                        .build(),
                ]
            })
            .collect();
        let mut pipeline = AnnotationPipeline::with_default_config(MockSource { frames });
        let doc = pipeline
            .process_medium(Path::new("/data/videos/a.mp4"))
            .unwrap()
            .unwrap();

        let regions: Vec<_> = doc.regions().collect();
        assert_eq!(regions.len(), 2);
        let json = serde_json::to_value(regions[1]).unwrap();
        assert_eq!(json["value"]["labels"][0], "Moving");
        assert_eq!(json["value"]["original_width"], 640);
        assert_eq!(json["value"]["sequence"][2]["frame"], 3);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PipelineConfig {
            movement_sensitivity: f64::NAN,
            ..Default::default()
        };
        let source = MockSource {
            frames: VecDeque::new(),
        };
        assert!(AnnotationPipeline::new(source, config).is_err());
    }
}
