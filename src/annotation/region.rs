//! Annotation regions as the review tool reads and writes them.
//!
//! Every region is a JSON object whose `type` field selects its shape.
//! Types produced by other tools (transcriptions, polygons, ...) are
//! accepted on import as [`Region::Other`] and ignored.

use serde::{Deserialize, Serialize};

use crate::trajectory::FrameSample;

/// Keyframe sequence of a video region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceValue {
    /// Resolved label of the track; may be absent on imported shape records
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub sequence: Vec<FrameSample>,
    #[serde(default)]
    pub original_width: u32,
    #[serde(default)]
    pub original_height: u32,
}

/// A labelled box on a still image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleValue {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub rectanglelabels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Region {
    /// Box track over time (shape record)
    VideoRectangle {
        id: String,
        from_name: String,
        to_name: String,
        value: SequenceValue,
    },
    /// Label attached to the box track with the same `id`
    Labels {
        id: String,
        from_name: String,
        to_name: String,
        value: SequenceValue,
    },
    RectangleLabels {
        #[serde(default)]
        id: String,
        from_name: String,
        to_name: String,
        value: RectangleValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<f32>,
    },
    #[serde(other)]
    Other,
}

impl Region {
    pub fn id(&self) -> Option<&str> {
        match self {
            Region::VideoRectangle { id, .. }
            | Region::Labels { id, .. }
            | Region::RectangleLabels { id, .. } => Some(id),
            Region::Other => None,
        }
    }

    /// Wire value of the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Region::VideoRectangle { .. } => "videorectangle",
            Region::Labels { .. } => "labels",
            Region::RectangleLabels { .. } => "rectanglelabels",
            Region::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_wire_format() {
        let region = Region::Labels {
            id: "ab12cd34".to_string(),
            from_name: "label".to_string(),
            to_name: "video".to_string(),
            value: SequenceValue {
                labels: vec!["Moving".to_string()],
                sequence: vec![],
                original_width: 1280,
                original_height: 720,
            },
        };
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["type"], "labels");
        assert_eq!(json["id"], "ab12cd34");
        assert_eq!(json["from_name"], "label");
        assert_eq!(json["to_name"], "video");
        assert_eq!(json["value"]["labels"][0], "Moving");
        assert_eq!(json["value"]["original_width"], 1280);
        assert_eq!(json["value"]["original_height"], 720);
    }

    #[test]
    fn test_unlabelled_shape_record_omits_labels() {
        let region = Region::VideoRectangle {
            id: "1".to_string(),
            from_name: "box".to_string(),
            to_name: "video".to_string(),
            value: SequenceValue {
                labels: vec![],
                sequence: vec![],
                original_width: 1,
                original_height: 1,
            },
        };
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["type"], "videorectangle");
        assert!(json["value"].get("labels").is_none());
    }

    #[test]
    fn test_unknown_type_is_other() {
        let region: Region = serde_json::from_str(
            r#"{"type": "textarea", "from_name": "transcription", "to_name": "audio",
                "value": {"text": ["hello"]}}"#,
        )
        .unwrap();
        assert_eq!(region, Region::Other);
        assert_eq!(region.id(), None);
    }

    #[test]
    fn test_reads_human_video_annotation() {
        let region: Region = serde_json::from_str(
            r#"{"id": "x", "type": "videorectangle", "from_name": "box", "to_name": "video",
                "value": {"labels": ["Car"], "framesCount": 90,
                          "sequence": [{"frame": 1, "x": 1, "y": 2, "width": 3, "height": 4,
                                        "enabled": false, "time": 0.0}]}}"#,
        )
        .unwrap();
        match region {
            Region::VideoRectangle { value, .. } => {
                assert_eq!(value.labels, vec!["Car".to_string()]);
                assert!(!value.sequence[0].enabled);
                assert_eq!(value.original_width, 0);
            }
            other => panic!("unexpected region {:?}", other),
        }
    }
}
