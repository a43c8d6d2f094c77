//! Contract with the external stage runner.
//!
//! One job maps to exactly one `StageRequest`; the runner answers with a
//! `StageResult` whose named outputs reference produced artifacts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Node type sent with every stage request.
pub const TEXT_TO_IMAGE_STAGE: &str = "text_to_image";

/// Status string a runner reports for a successful stage.
pub const STAGE_STATUS_COMPLETED: &str = "completed";

/// Name of the output reference carrying the produced image.
pub const IMAGE_OUTPUT: &str = "image";

/// A single downstream execution request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRequest {
    pub stage_id: String,
    pub node_type: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Reference to an artifact produced by a stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TensorRef {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub shape: Vec<i64>,
    #[serde(default)]
    pub dtype: String,
}

/// The runner's answer to a `StageRequest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    #[serde(default)]
    pub stage_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub output_refs: HashMap<String, TensorRef>,
}

impl StageResult {
    pub fn is_completed(&self) -> bool {
        self.status == STAGE_STATUS_COMPLETED
    }

    /// URI of the `image` output, if present and non-empty.
    pub fn image_uri(&self) -> Option<&str> {
        self.output_refs
            .get(IMAGE_OUTPUT)
            .map(|r| r.uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}

/// Response of the runner's health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_uri_requires_non_empty_uri() {
        let mut result = StageResult {
            status: "completed".to_string(),
            ..Default::default()
        };
        assert_eq!(result.image_uri(), None);

        result
            .output_refs
            .insert(IMAGE_OUTPUT.to_string(), TensorRef::default());
        assert_eq!(result.image_uri(), None);

        result.output_refs.insert(
            IMAGE_OUTPUT.to_string(),
            TensorRef {
                uri: "/artifacts/wf-1/output.png".to_string(),
                shape: vec![512, 512, 3],
                dtype: "uint8".to_string(),
            },
        );
        assert_eq!(result.image_uri(), Some("/artifacts/wf-1/output.png"));
        assert!(result.is_completed());
    }

    #[test]
    fn test_stage_result_deserializes_runner_payload() {
        let json = r#"{
            "stageId": "wf-1",
            "status": "failed",
            "errorMessage": "checkpoint not found"
        }"#;
        let result: StageResult = serde_json::from_str(json).unwrap();
        assert!(!result.is_completed());
        assert_eq!(result.error_message.as_deref(), Some("checkpoint not found"));
        assert!(result.output_refs.is_empty());
    }
}
