//! Pipeline configuration.
//!
//! Every environment-dependent knob (paths, URL prefix, class names,
//! thresholds) lives in [`PipelineConfig`], which is built once and handed
//! to [`AnnotationPipeline`](crate::integration::AnnotationPipeline) at
//! construction time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maps detector class ids to annotation label names.
///
/// Detections whose class id is missing from the map are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMap(BTreeMap<u32, String>);

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Person, bicycle and the vehicle classes of a COCO-trained detector.
    pub fn coco_traffic() -> Self {
        [
            (0, "Person"),
            (1, "bicycle"),
            (2, "Car"),
            (3, "Car"),
            (5, "Car"),
            (7, "Car"),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, class_id: u32, label: impl Into<String>) -> Option<String> {
        self.0.insert(class_id, label.into())
    }

    pub fn label(&self, class_id: u32) -> Option<&str> {
        self.0.get(&class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load a JSON object of `{"<class id>": "<label>"}` pairs.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("class map {}: {}", path.display(), e)))?;
        if map.is_empty() {
            return Err(Error::Config(format!(
                "class map {} defines no classes",
                path.display()
            )));
        }
        Ok(map)
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for ClassMap {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, name)| (id, name.into())).collect())
    }
}

/// What a medium with no surviving trajectories produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyMediumPolicy {
    /// Emit a document with an empty result list
    #[default]
    Emit,
    /// Emit no document for the medium
    Skip,
}

/// Which label a trajectory's label record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// `Static` or `Moving`, from the behavior classifier
    #[default]
    Behavior,
    /// The class name resolved on the trajectory's first sighting
    Class,
}

/// Top-level key wrapping a document's result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    /// Machine pre-annotations, reviewed by a human later
    #[default]
    Predictions,
    /// Final annotations
    Annotations,
}

/// How shared region ids are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// 8-character random token
    #[default]
    Random,
    /// Zero-padded counter starting at 1 for every document
    Sequential,
}

/// Kind of source medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Detections are aggregated into trajectories
    #[default]
    Video,
    /// Only the first frame is read; each detection becomes a standalone box
    Image,
}

impl MediaKind {
    /// Name of the annotation tool's object tag and of the `data` field.
    pub fn target(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        }
    }
}

/// `from_name` values of the emitted regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FromNames {
    /// Shape records (`videorectangle`)
    pub shape: String,
    /// Label records (`labels`)
    pub label: String,
    /// Still-image boxes (`rectanglelabels`)
    pub rectangle: String,
}

impl Default for FromNames {
    fn default() -> Self {
        Self {
            shape: "box".to_string(),
            label: "label".to_string(),
            rectangle: "label".to_string(),
        }
    }
}

/// Configuration for the whole detection → annotation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// `None` accepts every class and leaves class labels unresolved
    pub class_map: Option<ClassMap>,
    /// Movement sensitivity `S`; trajectories faster than `S / 10`
    /// percent-of-frame per frame are `Moving`
    pub movement_sensitivity: f64,
    /// Access-scheme prefix placed before the media path in `data`
    pub url_prefix: String,
    /// Media paths are made relative to this directory
    pub media_root: PathBuf,
    pub media_kind: MediaKind,
    pub empty_media: EmptyMediumPolicy,
    pub label_source: LabelSource,
    /// Label used when [`LabelSource::Class`] finds no class name
    pub fallback_label: String,
    pub envelope: EnvelopeKind,
    pub model_version: Option<String>,
    pub prediction_score: Option<f64>,
    pub region_ids: IdStrategy,
    pub from_names: FromNames,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            class_map: Some(ClassMap::coco_traffic()),
            movement_sensitivity: 2.0,
            url_prefix: "/data/local-files/?d=data/".to_string(),
            media_root: PathBuf::from("/data"),
            media_kind: MediaKind::Video,
            empty_media: EmptyMediumPolicy::Emit,
            label_source: LabelSource::Behavior,
            fallback_label: "Defect".to_string(),
            envelope: EnvelopeKind::Predictions,
            model_version: None,
            prediction_score: None,
            region_ids: IdStrategy::Random,
            from_names: FromNames::default(),
        }
    }
}

impl PipelineConfig {
    /// Load and validate a JSON config file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.movement_sensitivity.is_finite() || self.movement_sensitivity < 0.0 {
            return Err(Error::Config(format!(
                "movement_sensitivity must be a non-negative number, got {}",
                self.movement_sensitivity
            )));
        }
        if self.class_map.as_ref().is_some_and(ClassMap::is_empty) {
            return Err(Error::Config("class_map defines no classes".to_string()));
        }
        if self.label_source == LabelSource::Class && self.fallback_label.is_empty() {
            return Err(Error::Config(
                "fallback_label must not be empty when labelling by class".to_string(),
            ));
        }
        if self.prediction_score.is_some_and(|score| !score.is_finite()) {
            return Err(Error::Config("prediction_score must be finite".to_string()));
        }
        Ok(())
    }
}
