//! Annotation documents for the video review tool.
//!
//! Trajectories become pairs of regions sharing one id: a `videorectangle`
//! carrying the box sequence and a `labels` region carrying the same
//! sequence plus the trajectory's label.

mod document;
mod export;
mod ids;
mod media;
mod region;
mod serializer;

pub use document::{AnnotationDocument, ResultSet, read_documents, write_documents};
pub use export::{YoloLabel, frame_labels, image_labels, to_lines};
pub use ids::RegionIds;
pub use media::media_url;
pub use region::{RectangleValue, Region, SequenceValue};
pub use serializer::{AnnotationSerializer, MediaMeta};
