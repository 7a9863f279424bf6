use ndarray::{ArrayViewD, Axis};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::decoder::ImageTensor;

pub const PING_MESSAGE: &str = "Hello, I am alive";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PingResponse {
    pub message: String,
}

impl PingResponse {
    pub fn alive() -> Self {
        PingResponse {
            message: PING_MESSAGE.to_string(),
        }
    }
}

/// Top class chosen from a prediction vector.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub class: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Array view written out as nested JSON lists, element by element.
#[derive(Debug)]
pub struct NestedArray<'a>(ArrayViewD<'a, u8>);

impl Serialize for NestedArray<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.ndim() {
            0 => serializer.serialize_u8(self.0.iter().next().copied().unwrap_or_default()),
            1 => {
                let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
                for value in self.0.iter() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            _ => {
                let mut seq = serializer.serialize_seq(Some(self.0.len_of(Axis(0))))?;
                for sub in self.0.outer_iter() {
                    seq.serialize_element(&NestedArray(sub))?;
                }
                seq.end()
            }
        }
    }
}

/// Request body understood by the model server: one nested H×W×C array per
/// batch element.
#[derive(Debug, Serialize)]
pub struct ModelRequest<'a> {
    pub instances: NestedArray<'a>,
}

impl<'a> ModelRequest<'a> {
    /// Wraps a single image in a leading batch axis of size 1.
    pub fn batch_of_one(image: &'a ImageTensor) -> Self {
        ModelRequest {
            instances: NestedArray(image.view().insert_axis(Axis(0)).into_dyn()),
        }
    }
}

/// Model server answer, one score vector per batch element.
#[derive(Debug, Deserialize)]
pub struct ModelResponse {
    pub predictions: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use serde_json::json;

    #[test]
    fn prediction_serializes_with_class_key() {
        let prediction = Prediction {
            class: "Late_blight".to_string(),
            confidence: 0.7,
        };
        assert_eq!(
            serde_json::to_value(&prediction).unwrap(),
            json!({ "class": "Late_blight", "confidence": 0.7 })
        );
    }

    #[test]
    fn model_response_requires_predictions() {
        let ok: ModelResponse =
            serde_json::from_value(json!({ "predictions": [[0.1, 0.7, 0.2]] })).unwrap();
        assert_eq!(ok.predictions, vec![vec![0.1, 0.7, 0.2]]);

        assert!(serde_json::from_value::<ModelResponse>(json!({ "outputs": [] })).is_err());
        assert!(serde_json::from_value::<ModelResponse>(json!({ "predictions": "x" })).is_err());
    }

    #[test]
    fn model_response_keeps_double_precision() {
        let body = r#"{"predictions": [[0.3, 0.30000001, 0.123456789012]]}"#;
        let parsed: ModelResponse = serde_json::from_str(body).unwrap();
        let scores = &parsed.predictions[0];
        assert!(scores[1] > scores[0]);
        assert_eq!(scores[2], 0.123456789012);
    }

    #[test]
    fn batch_of_one_has_image_layout() {
        let image = Array3::from_shape_fn((2, 3, 3), |(y, x, c)| (y * 100 + x * 10 + c) as u8);
        let body = serde_json::to_value(ModelRequest::batch_of_one(&image)).unwrap();

        let batch = body["instances"].as_array().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].as_array().unwrap().len(), 2);
        assert_eq!(batch[0][0].as_array().unwrap().len(), 3);
        assert_eq!(batch[0][1][2], json!([120, 121, 122]));
    }

    #[test]
    fn request_body_is_nested_json() {
        let image = Array3::from_shape_vec((1, 2, 1), vec![7u8, 9]).unwrap();
        let body = serde_json::to_value(ModelRequest::batch_of_one(&image)).unwrap();
        assert_eq!(body, json!({ "instances": [[[[7], [9]]]] }));
    }

    #[test]
    fn strided_image_follows_logical_order() {
        let image = Array3::from_shape_fn((2, 3, 1), |(y, x, _)| (y * 10 + x) as u8);
        let swapped = image.reversed_axes();
        assert_eq!(swapped.shape(), &[1, 3, 2]);

        let body = serde_json::to_value(ModelRequest::batch_of_one(&swapped)).unwrap();
        assert_eq!(body, json!({ "instances": [[[[0, 10], [1, 11], [2, 12]]]] }));
    }
}
