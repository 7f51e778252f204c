mod aggregator;
mod behavior;
mod detection;
mod rect;
mod sample;

pub use aggregator::{Aggregation, AggregationStats, Ingest, Trajectory, TrajectoryAggregator};
pub use behavior::{Behavior, BehaviorClassifier, ClassifiedTrajectory, Motion};
pub use detection::Detection;
pub use rect::{FrameSize, PercentRect, Rect, to_percent, to_pixel};
pub use sample::FrameSample;
