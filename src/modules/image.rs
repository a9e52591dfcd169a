//! Image generation API wrappers for Runway.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::{RunwayClient, RunwayError};
use crate::modules::tasks;

// === Types ===

/// A reference image supplied to generation operations.
///
/// `uri` is either a remote address or an embedded data URI; `tag` lets the
/// prompt text refer to the image by name. Tag uniqueness across a request
/// is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceImage {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Options for a text-to-image request.
#[derive(Debug, Clone)]
pub struct TextToImageOptions {
    pub model: String,
    pub prompt_text: String,
    pub ratio: Option<String>,
    pub seed: Option<u64>,
    pub style: Option<String>,
    pub reference_images: Vec<ReferenceImage>,
}

// === API Calls ===

/// Submit a text-to-image request and wait for the task to finish.
pub async fn text_to_image(
    client: &RunwayClient,
    options: TextToImageOptions,
) -> Result<Value, RunwayError> {
    let mut body = json!({
        "model": options.model,
        "promptText": options.prompt_text,
    });

    if let Some(ratio) = options.ratio {
        body["ratio"] = json!(ratio);
    }
    if let Some(seed) = options.seed {
        body["seed"] = json!(seed);
    }
    if let Some(style) = options.style {
        body["style"] = json!(style);
    }
    if !options.reference_images.is_empty() {
        body["referenceImages"] = json!(options.reference_images);
    }

    tasks::submit_and_wait(client, "/v1/text_to_image", &body).await
}

// === Unit Tests ===
