//! Per-medium annotation document and JSON output.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotation::region::Region;
use crate::config::EnvelopeKind;
use crate::error::{Error, Result};

/// One list of regions, either a model's prediction or a human annotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub result: Vec<Region>,
}

/// Import task for one medium.
///
/// Exactly one of `predictions` / `annotations` is set on documents built
/// by [`AnnotationDocument::new`]; exported tasks may carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    /// Media field name (`video`, `image`) → access URL
    pub data: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<ResultSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<ResultSet>>,
}

impl AnnotationDocument {
    pub fn new(
        field: impl Into<String>,
        url: impl Into<String>,
        envelope: EnvelopeKind,
        results: ResultSet,
    ) -> Self {
        let data = BTreeMap::from([(field.into(), url.into())]);
        let (predictions, annotations) = match envelope {
            EnvelopeKind::Predictions => (Some(vec![results]), None),
            EnvelopeKind::Annotations => (None, Some(vec![results])),
        };
        Self {
            data,
            predictions,
            annotations,
        }
    }

    pub fn url(&self, field: &str) -> Option<&str> {
        self.data.get(field).map(String::as_str)
    }

    /// Human annotations when present, otherwise predictions.
    pub fn result_sets(&self) -> &[ResultSet] {
        match (&self.annotations, &self.predictions) {
            (Some(sets), _) if !sets.is_empty() => sets.as_slice(),
            (_, Some(sets)) => sets.as_slice(),
            (Some(sets), None) => sets.as_slice(),
            (None, None) => &[],
        }
    }

    /// Every region across all result sets.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.result_sets().iter().flat_map(|set| set.result.iter())
    }
}

/// Write documents as a pretty-printed JSON array.
pub fn write_documents(path: impl AsRef<Path>, documents: &[AnnotationDocument]) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, documents)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Read a JSON array of documents, e.g. a task export from the review tool.
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<AnnotationDocument>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictions_envelope() {
        let doc = AnnotationDocument::new(
            "video",
            "/data/local-files/?d=data/a.mp4",
            EnvelopeKind::Predictions,
            ResultSet {
                model_version: Some("tracker_v2".to_string()),
                score: Some(0.5),
                result: vec![],
            },
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["data"]["video"], "/data/local-files/?d=data/a.mp4");
        assert_eq!(json["predictions"][0]["model_version"], "tracker_v2");
        assert_eq!(json["predictions"][0]["score"], 0.5);
        assert!(json["predictions"][0]["result"].as_array().unwrap().is_empty());
        assert!(json.get("annotations").is_none());
    }

    #[test]
    fn test_annotations_envelope() {
        let doc =
            AnnotationDocument::new("image", "u", EnvelopeKind::Annotations, ResultSet::default());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("predictions").is_none());
        assert!(json["annotations"][0].get("model_version").is_none());
        assert_eq!(doc.url("image"), Some("u"));
        assert_eq!(doc.result_sets().len(), 1);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let docs = vec![AnnotationDocument::new(
            "video",
            "u",
            EnvelopeKind::Predictions,
            ResultSet::default(),
        )];
        write_documents(&path, &docs).unwrap();
        let back = read_documents(&path).unwrap();
        assert_eq!(back, docs);
    }

    #[test]
    fn test_read_back_keeps_exact_floats() {
        use crate::annotation::region::SequenceValue;
        use crate::trajectory::{FrameSample, PercentRect};

        let sequence = (0..90u32)
            .map(|i| {
                let v = i as f64 / 30.0 + 7.0 / 30.0;
                let rect = PercentRect {
                    x: v,
                    y: v / 3.0,
                    width: 100.0 / 7.0,
                    height: v * 1.1,
                };
                FrameSample::from_detection_frame(i, rect, 29.97)
            })
            .collect();
        let region = Region::VideoRectangle {
            id: "00000000".to_string(),
            from_name: "box".to_string(),
            to_name: "video".to_string(),
            value: SequenceValue {
                labels: vec!["Moving".to_string()],
                sequence,
                original_width: 1920,
                original_height: 1080,
            },
        };
        let docs = vec![AnnotationDocument::new(
            "video",
            "u",
            EnvelopeKind::Predictions,
            ResultSet {
                result: vec![region],
                ..Default::default()
            },
        )];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floats.json");
        write_documents(&path, &docs).unwrap();
        assert_eq!(read_documents(&path).unwrap(), docs);
    }
}
