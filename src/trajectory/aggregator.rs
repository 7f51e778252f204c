//! Groups per-frame detections by tracker identity into trajectories.

use std::collections::HashMap;

use crate::config::ClassMap;
use crate::trajectory::detection::Detection;
use crate::trajectory::sample::FrameSample;

/// Ordered keyframes of one tracked object.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub identity: u64,
    /// Class id of the first detection seen for this identity
    pub class_id: u32,
    /// Label name for `class_id`, when a class map is configured
    pub class_label: Option<String>,
    /// Samples in strictly increasing frame order
    pub samples: Vec<FrameSample>,
}

impl Trajectory {
    fn new(identity: u64, class_id: u32, class_label: Option<String>) -> Self {
        Self {
            identity,
            class_id,
            class_label,
            samples: Vec::new(),
        }
    }

    pub fn first(&self) -> Option<&FrameSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&FrameSample> {
        self.samples.last()
    }

    /// Frames between the first and last sample.
    pub fn frame_span(&self) -> u32 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.frame_index.saturating_sub(first.frame_index),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

/// What happened to a detection fed to [`TrajectoryAggregator::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    /// First sighting of the identity; a trajectory was created
    Started,
    /// Sample appended to an existing trajectory
    Appended,
    /// Same identity and frame as the previous sample, which it replaced
    Replaced,
    /// Class id is not in the class map
    UnmappedClass,
    /// No tracker identity
    Untracked,
    /// Frame size has a zero dimension
    InvalidFrame,
    /// Frame index is lower than the trajectory's last sample
    OutOfOrder,
}

impl Ingest {
    pub fn is_kept(&self) -> bool {
        matches!(self, Ingest::Started | Ingest::Appended | Ingest::Replaced)
    }
}

/// Counters for one medium's detection stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub frames: u64,
    pub detections: u64,
    pub samples: u64,
    pub replaced: u64,
    pub unmapped_class: u64,
    pub untracked: u64,
    pub invalid_frame: u64,
    pub out_of_order: u64,
}

impl AggregationStats {
    pub fn dropped(&self) -> u64 {
        self.unmapped_class + self.untracked + self.invalid_frame + self.out_of_order
    }

    pub fn merge(&mut self, other: &AggregationStats) {
        self.frames += other.frames;
        self.detections += other.detections;
        self.samples += other.samples;
        self.replaced += other.replaced;
        self.unmapped_class += other.unmapped_class;
        self.untracked += other.untracked;
        self.invalid_frame += other.invalid_frame;
        self.out_of_order += other.out_of_order;
    }

    pub(crate) fn record(&mut self, outcome: Ingest) {
        self.detections += 1;
        match outcome {
            Ingest::Started | Ingest::Appended => self.samples += 1,
            Ingest::Replaced => self.replaced += 1,
            Ingest::UnmappedClass => self.unmapped_class += 1,
            Ingest::Untracked => self.untracked += 1,
            Ingest::InvalidFrame => self.invalid_frame += 1,
            Ingest::OutOfOrder => self.out_of_order += 1,
        }
    }
}

/// Finished trajectories of one medium, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub trajectories: Vec<Trajectory>,
    pub stats: AggregationStats,
}

/// Single-pass accumulator from detections to trajectories.
///
/// Detections must arrive in non-decreasing frame order, as a tracker
/// emits them.
pub struct TrajectoryAggregator<'a> {
    class_map: Option<&'a ClassMap>,
    fps: f64,
    trajectories: Vec<Trajectory>,
    index: HashMap<u64, usize>,
    stats: AggregationStats,
}

impl<'a> TrajectoryAggregator<'a> {
    pub fn new(class_map: Option<&'a ClassMap>, fps: f64) -> Self {
        Self {
            class_map,
            fps,
            trajectories: Vec::new(),
            index: HashMap::new(),
            stats: AggregationStats::default(),
        }
    }

    /// Feed all detections of one frame. An empty batch is a no-op apart
    /// from the frame counter.
    pub fn push_frame<I>(&mut self, detections: I)
    where
        I: IntoIterator<Item = Detection>,
    {
        self.stats.frames += 1;
        for det in detections {
            self.push(det);
        }
    }

    pub fn push(&mut self, det: Detection) -> Ingest {
        let outcome = self.ingest(det);
        self.stats.record(outcome);
        outcome
    }

    fn ingest(&mut self, det: Detection) -> Ingest {
        let class_label = match self.class_map {
            Some(map) => match map.label(det.class_id) {
                Some(label) => Some(label),
                None => return Ingest::UnmappedClass,
            },
            None => None,
        };

        let Some(identity) = det.identity else {
            return Ingest::Untracked;
        };

        if !det.frame_size.is_valid() {
            tracing::warn!(
                identity,
                frame = det.frame_index,
                width = det.frame_size.width,
                height = det.frame_size.height,
                "Dropping detection with zero-sized frame"
            );
            return Ingest::InvalidFrame;
        }

        let sample = FrameSample::from_detection_frame(
            det.frame_index,
            det.bbox.to_percent(det.frame_size),
            self.fps,
        );

        let existing = self.index.get(&identity).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                // First sighting fixes the class for the trajectory's lifetime.
                let slot = self.trajectories.len();
                self.trajectories.push(Trajectory::new(
                    identity,
                    det.class_id,
                    class_label.map(str::to_string),
                ));
                self.index.insert(identity, slot);
                self.trajectories[slot].samples.push(sample);
                return Ingest::Started;
            }
        };

        let trajectory = &mut self.trajectories[slot];
        if trajectory.class_id != det.class_id {
            tracing::trace!(
                identity,
                first = trajectory.class_id,
                seen = det.class_id,
                "Ignoring class change on existing trajectory"
            );
        }

        match trajectory.samples.last_mut() {
            Some(last) if last.frame_index == sample.frame_index => {
                *last = sample;
                Ingest::Replaced
            }
            Some(last) if last.frame_index > sample.frame_index => {
                tracing::warn!(
                    identity,
                    frame = sample.frame_index,
                    last = last.frame_index,
                    "Dropping out-of-order detection"
                );
                Ingest::OutOfOrder
            }
            _ => {
                trajectory.samples.push(sample);
                Ingest::Appended
            }
        }
    }

    /// Number of identities seen so far.
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    pub fn get(&self, identity: u64) -> Option<&Trajectory> {
        self.index.get(&identity).map(|&slot| &self.trajectories[slot])
    }

    /// End of stream: hand over the finished trajectories.
    pub fn finish(self) -> Aggregation {
        Aggregation {
            trajectories: self.trajectories,
            stats: self.stats,
        }
    }
}
