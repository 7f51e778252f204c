//! Trajectory annotations from tracked object detections.
//!
//! Per-frame detections carrying a tracker identity are grouped into
//! trajectories, converted to percentage coordinates, labelled by movement
//! and written as paired `videorectangle`/`labels` regions that a video
//! review tool can import.

pub mod annotation;
pub mod config;
pub mod error;
pub mod integration;
pub mod trajectory;

pub use annotation::{AnnotationDocument, AnnotationSerializer, MediaMeta, Region, write_documents};
pub use config::{ClassMap, EmptyMediumPolicy, LabelSource, PipelineConfig};
pub use error::{Error, Result};
pub use integration::{AnnotationPipeline, DetectionBuilder, DetectionSource, FrameBoxes, MediaInfo};
pub use trajectory::{
    Behavior, BehaviorClassifier, Detection, FrameSample, FrameSize, Trajectory,
    TrajectoryAggregator,
};
