//! Integration module for connecting detector/tracker engines with the
//! annotation pipeline.
//!
//! This module provides the traits a tracking backend implements and the
//! pipeline that drives it medium by medium.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, FrameBoxes, IntoDetections, MediaInfo};
pub use pipeline::{AnnotationPipeline, RunReport, SkippedMedium};
