//! Movement classification of finished trajectories.

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::config::LabelSource;
use crate::trajectory::aggregator::Trajectory;

/// Movement label of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    /// Did not move faster than the threshold
    #[default]
    Static,
    /// Moved faster than the threshold
    Moving,
}

impl Behavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Static => "Static",
            Behavior::Moving => "Moving",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoint motion of a trajectory in percentage space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Euclidean distance between the first and last sample's top-left corner
    pub distance: f64,
    /// Frames between the first and last sample
    pub span: u32,
    /// `distance / span`, or 0 when the span is 0
    pub speed: f64,
}

/// A trajectory together with its movement label and the label it is
/// published under.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTrajectory {
    pub trajectory: Trajectory,
    pub behavior: Behavior,
    pub label: String,
}

/// Two-point speed classifier.
///
/// Only the first and last samples are compared, so an object that leaves
/// and returns to its start position is `Static`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorClassifier {
    sensitivity: f64,
}

impl BehaviorClassifier {
    /// `sensitivity` is `S`; the speed threshold is `S / 10`.
    pub fn new(sensitivity: f64) -> Self {
        Self { sensitivity }
    }

    pub fn speed_threshold(&self) -> f64 {
        self.sensitivity / 10.0
    }

    /// `None` for a trajectory without samples.
    pub fn measure(&self, trajectory: &Trajectory) -> Option<Motion> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;

        let start = Vector2::new(first.x, first.y);
        let end = Vector2::new(last.x, last.y);
        let distance = (end - start).norm();
        let span = trajectory.frame_span();
        let speed = if span == 0 {
            0.0
        } else {
            distance / span as f64
        };

        Some(Motion {
            distance,
            span,
            speed,
        })
    }

    pub fn classify(&self, trajectory: &Trajectory) -> Behavior {
        match self.measure(trajectory) {
            Some(motion) if motion.span > 0 && motion.speed > self.speed_threshold() => {
                Behavior::Moving
            }
            _ => Behavior::Static,
        }
    }

    /// Classify every trajectory and resolve the label it is published under.
    pub fn classify_all(
        &self,
        trajectories: Vec<Trajectory>,
        source: LabelSource,
        fallback_label: &str,
    ) -> Vec<ClassifiedTrajectory> {
        trajectories
            .into_iter()
            .map(|trajectory| {
                let behavior = self.classify(&trajectory);
                let label = match source {
                    LabelSource::Behavior => behavior.as_str().to_string(),
                    LabelSource::Class => trajectory
                        .class_label
                        .clone()
                        .unwrap_or_else(|| fallback_label.to_string()),
                };
                tracing::debug!(
                    identity = trajectory.identity,
                    samples = trajectory.len(),
                    %behavior,
                    %label,
                    "Classified trajectory"
                );
                ClassifiedTrajectory {
                    trajectory,
                    behavior,
                    label,
                }
            })
            .collect()
    }
}
