//! Generate-world request handling
//!
//! Transport-agnostic: a caller hands over the decoded JSON body (or the raw
//! bytes) and gets back the status code and JSON body to send.
//!
//! | outcome | status | body |
//! |---|---|---|
//! | `prompt` missing, not a string, or empty | 400 | `{"error": "Missing or invalid prompt"}` |
//! | generator succeeded | 200 | `{"scene": <validated scene>}` |
//! | generator failed | 500 | `{"error": <message>}` |

use crate::generator::Generator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use worldgen_core::{validate_with_report, SceneGraph};

pub const INVALID_PROMPT: &str = "Missing or invalid prompt";
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// JSON body of a generate-world response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Scene { scene: SceneGraph },
    Error { error: String },
}

/// Status code plus body for a generate-world request
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl GenerateResponse {
    pub fn ok(scene: SceneGraph) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Scene { scene },
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Error {
                error: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        match &self.body {
            ResponseBody::Scene { scene } => Some(scene),
            ResponseBody::Error { .. } => None,
        }
    }

    pub fn into_scene(self) -> Option<SceneGraph> {
        match self.body {
            ResponseBody::Scene { scene } => Some(scene),
            ResponseBody::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Error { error } => Some(error),
            ResponseBody::Scene { .. } => None,
        }
    }

    /// The body as a JSON value
    pub fn to_json(&self) -> Value {
        match &self.body {
            ResponseBody::Scene { scene } => serde_json::json!({ "scene": scene }),
            ResponseBody::Error { error } => serde_json::json!({ "error": error }),
        }
    }
}

/// Handle a decoded generate-world request body
pub async fn handle_generate<G: Generator>(generator: &G, body: &Value) -> GenerateResponse {
    let Some(prompt) = body
        .get("prompt")
        .and_then(Value::as_str)
        .filter(|prompt| !prompt.is_empty())
    else {
        tracing::warn!("Rejected generate request: {}", INVALID_PROMPT);
        return GenerateResponse::error(400, INVALID_PROMPT);
    };

    match generator.generate(prompt).await {
        Ok(raw) => {
            let (scene, report) = validate_with_report(&raw);
            tracing::debug!(
                "Generated scene '{}' with {} nodes ({} dropped)",
                scene.id,
                scene.node_count(),
                report.dropped_nodes + report.depth_pruned
            );
            GenerateResponse::ok(scene)
        }
        Err(err) => {
            tracing::warn!("Error generating world: {}", err);
            let message = err.to_string();
            if message.is_empty() {
                GenerateResponse::error(500, UNKNOWN_ERROR)
            } else {
                GenerateResponse::error(500, message)
            }
        }
    }
}

/// Handle a raw request body; bodies that are not JSON are rejected as an
/// invalid prompt
pub async fn handle_generate_bytes<G: Generator>(generator: &G, body: &[u8]) -> GenerateResponse {
    match serde_json::from_slice::<Value>(body) {
        Ok(body) => handle_generate(generator, &body).await,
        Err(err) => {
            tracing::warn!("Rejected generate request, body is not JSON: {}", err);
            GenerateResponse::error(400, INVALID_PROMPT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerateError, Result};
    use crate::generator::MockGenerator;
    use serde_json::json;
    use std::future::Future;

    struct FixedGenerator(std::result::Result<Value, GenerateError>);

    impl Generator for FixedGenerator {
        fn generate(&self, _prompt: &str) -> impl Future<Output = Result<Value>> + Send {
            std::future::ready(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_invalid_prompts_rejected() {
        let generator = MockGenerator::new();
        for body in [
            json!({}),
            json!({ "prompt": null }),
            json!({ "prompt": 42 }),
            json!({ "prompt": "" }),
            json!({ "prompt": ["village"] }),
            json!("village"),
        ] {
            let response = handle_generate(&generator, &body).await;
            assert_eq!(response.status, 400);
            assert_eq!(response.to_json(), json!({ "error": "Missing or invalid prompt" }));
        }

        let response = handle_generate_bytes(&generator, b"{ prompt: ").await;
        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn test_success_returns_validated_scene() {
        let generator = FixedGenerator(Ok(json!({
            "id": "w",
            "children": [{ "id": "ship", "type": "spaceship", "position": [1, 2, 3], "color": [9, 9, 9] }]
        })));

        let response = handle_generate(&generator, &json!({ "prompt": "space" })).await;
        assert!(response.is_success());

        let scene = response.scene().unwrap();
        let ship = scene.find_path("ship").unwrap();
        assert_eq!(ship.kind.as_str(), "box");
        assert_eq!(ship.color.to_array(), [1.0, 1.0, 1.0]);

        let body = response.to_json();
        assert_eq!(body["scene"]["children"][0]["type"], "box");
        assert!(body["scene"]["children"][0].get("children").is_none());
    }

    #[tokio::test]
    async fn test_malformed_generator_output_still_succeeds() {
        let generator = FixedGenerator(Ok(json!(["not", "a", "scene"])));
        let response = handle_generate(&generator, &json!({ "prompt": "x" })).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.into_scene().unwrap().paths(), vec!["terrain"]);
    }

    #[tokio::test]
    async fn test_generator_failure() {
        let generator = FixedGenerator(Err(GenerateError::backend("quota exceeded")));
        let response = handle_generate(&generator, &json!({ "prompt": "x" })).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.error_message(), Some("quota exceeded"));

        let generator = FixedGenerator(Err(GenerateError::backend("")));
        let response = handle_generate(&generator, &json!({ "prompt": "x" })).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.error_message(), Some(UNKNOWN_ERROR));
    }

    #[tokio::test]
    async fn test_malformed_completion_is_server_error() {
        let generator = crate::generator::ReplayGenerator::new("Sorry, I cannot draw that.");
        let response = handle_generate(&generator, &json!({ "prompt": "x" })).await;
        assert_eq!(response.status, 500);
        assert!(response
            .error_message()
            .unwrap()
            .starts_with("Generator returned malformed output: "));
    }

    #[tokio::test]
    async fn test_bytes_round_trip_through_body() {
        let response =
            handle_generate_bytes(&MockGenerator::new(), br#"{"prompt":"a mountain pass"}"#).await;
        let text = serde_json::to_string(&response.body).unwrap();
        let parsed: ResponseBody = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, response.body);
        assert!(response.scene().unwrap().find_path("mountain_main").is_some());
    }
}
