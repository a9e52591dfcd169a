//! Runway API tools: image generation, video generation, upscaling, and
//! task lifecycle operations.
//!
//! Every tool follows the same shape: validate inputs, acquire the shared
//! client through the context, perform one vendor call (awaiting task
//! completion for generation operations), and normalize the outcome into a
//! result envelope. Validation failures never reach the network.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::modules::image::{self, ReferenceImage};
use crate::modules::tasks;
use crate::modules::video;
use crate::tools::envelope;
use crate::tools::spec::{
    ToolCapability, ToolContext, ToolError, ToolResult, ToolSpec, optional_str, optional_u64,
    required_str,
};

const DEFAULT_IMAGE_MODEL: &str = "gen4_image";
const DEFAULT_TEXT_TO_VIDEO_MODEL: &str = "veo3";
const DEFAULT_IMAGE_TO_VIDEO_MODEL: &str = "gen4_turbo";
const DEFAULT_VIDEO_TO_VIDEO_MODEL: &str = "gen4_aleph";
const DEFAULT_UPSCALE_MODEL: &str = "upscale_v1";

const MAX_REFERENCE_IMAGES: usize = 4;
const MAX_LIST_LIMIT: u64 = 100;

// === Helpers ===

/// Parse a reference-image list, rejecting malformed entries with an
/// index-identifying message. When `required`, the list must carry at
/// least one entry.
fn parse_reference_images(
    input: &Value,
    field: &str,
    required: bool,
) -> Result<Vec<ReferenceImage>, ToolError> {
    let Some(value) = input.get(field) else {
        if required {
            return Err(ToolError::missing_field(field));
        }
        return Ok(Vec::new());
    };

    let Some(entries) = value.as_array() else {
        return Err(ToolError::invalid_input(format!(
            "{field} must be an array of objects with a 'uri' field"
        )));
    };

    if required && entries.is_empty() {
        return Err(ToolError::invalid_input(format!(
            "{field} must contain at least one entry"
        )));
    }
    if entries.len() > MAX_REFERENCE_IMAGES {
        return Err(ToolError::invalid_input(format!(
            "{field} supports at most {MAX_REFERENCE_IMAGES} entries"
        )));
    }

    let mut images = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let uri = entry
            .get("uri")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                ToolError::invalid_input(format!(
                    "{field}[{index}] is missing required field 'uri'"
                ))
            })?;
        let tag = entry
            .get("tag")
            .and_then(|v| v.as_str())
            .map(std::string::ToString::to_string);
        images.push(ReferenceImage {
            uri: uri.to_string(),
            tag,
        });
    }
    Ok(images)
}

fn clamped_limit(input: &Value) -> Result<Option<u64>, ToolError> {
    Ok(optional_u64(input, "limit")?.map(|limit| limit.min(MAX_LIST_LIMIT)))
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(std::string::ToString::to_string)
}

// === Image Generation Tools ===

/// Tool for generating images from text prompts using Runway.
pub struct GenerateImageTool;

#[async_trait]
impl ToolSpec for GenerateImageTool {
    fn name(&self) -> &'static str {
        "GenerateImage"
    }

    fn description(&self) -> &'static str {
        "Generate an image from a text prompt using Runway. Waits for the task to complete and returns the image URL."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "promptText": {
                    "type": "string",
                    "description": "Text prompt describing the image to generate"
                },
                "model": {
                    "type": "string",
                    "description": "Image model name",
                    "enum": ["gen4_image"],
                    "default": "gen4_image"
                },
                "ratio": {
                    "type": "string",
                    "description": "Output resolution",
                    "enum": [
                        "1920:1080", "1080:1920", "1024:1024", "1360:768",
                        "1080:1080", "1168:880", "1440:1080", "1080:1440",
                        "1808:768", "2112:912"
                    ]
                },
                "seed": {
                    "type": "integer",
                    "description": "Seed for deterministic generation",
                    "minimum": 0,
                    "maximum": 4294967295u64
                },
                "style": {
                    "type": "string",
                    "description": "Style preset for the generation"
                }
            },
            "required": ["promptText"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let prompt_text = required_str(&input, "promptText")?.to_string();
        let model = optional_str(&input, "model")?
            .unwrap_or(DEFAULT_IMAGE_MODEL)
            .to_string();
        let ratio = owned(optional_str(&input, "ratio")?);
        let seed = optional_u64(&input, "seed")?;
        let style = owned(optional_str(&input, "style")?);

        let client = context.client()?;
        let options = image::TextToImageOptions {
            model: model.clone(),
            prompt_text: prompt_text.clone(),
            ratio: ratio.clone(),
            seed,
            style: style.clone(),
            reference_images: Vec::new(),
        };

        let result = match image::text_to_image(client, options).await {
            Ok(task) => envelope::generation_success(
                &task,
                "imageUrl",
                json!({
                    "promptText": prompt_text,
                    "model": model,
                    "ratio": ratio,
                    "seed": seed,
                    "style": style,
                }),
            ),
            Err(e) => envelope::classify("generate image", None, e),
        };
        Ok(envelope::to_result(result))
    }
}

/// Tool for generating images guided by tagged reference images.
pub struct GenerateImageWithReferencesTool;

#[async_trait]
impl ToolSpec for GenerateImageWithReferencesTool {
    fn name(&self) -> &'static str {
        "GenerateImageWithReferences"
    }

    fn description(&self) -> &'static str {
        "Generate an image from a text prompt and 1-4 reference images using Runway. Reference tags can be mentioned in the prompt (e.g. @fox)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "promptText": {
                    "type": "string",
                    "description": "Text prompt describing the image; may reference tags with @tag"
                },
                "referenceImages": {
                    "type": "array",
                    "description": "Reference images guiding the generation",
                    "minItems": 1,
                    "maxItems": 4,
                    "items": {
                        "type": "object",
                        "properties": {
                            "uri": {
                                "type": "string",
                                "description": "HTTPS URL or data URI of the reference image"
                            },
                            "tag": {
                                "type": "string",
                                "description": "Optional name used to reference this image in the prompt"
                            }
                        },
                        "required": ["uri"]
                    }
                },
                "model": {
                    "type": "string",
                    "enum": ["gen4_image"],
                    "default": "gen4_image"
                },
                "ratio": {
                    "type": "string",
                    "enum": [
                        "1920:1080", "1080:1920", "1024:1024", "1360:768",
                        "1080:1080", "1168:880", "1440:1080", "1080:1440",
                        "1808:768", "2112:912"
                    ]
                },
                "seed": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 4294967295u64
                }
            },
            "required": ["promptText", "referenceImages"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let prompt_text = required_str(&input, "promptText")?.to_string();
        let reference_images = parse_reference_images(&input, "referenceImages", true)?;
        let model = optional_str(&input, "model")?
            .unwrap_or(DEFAULT_IMAGE_MODEL)
            .to_string();
        let ratio = owned(optional_str(&input, "ratio")?);
        let seed = optional_u64(&input, "seed")?;

        let reference_count = reference_images.len();
        let client = context.client()?;
        let options = image::TextToImageOptions {
            model: model.clone(),
            prompt_text: prompt_text.clone(),
            ratio: ratio.clone(),
            seed,
            style: None,
            reference_images,
        };

        let result = match image::text_to_image(client, options).await {
            Ok(task) => envelope::generation_success(
                &task,
                "imageUrl",
                json!({
                    "promptText": prompt_text,
                    "model": model,
                    "ratio": ratio,
                    "seed": seed,
                    "referenceImageCount": reference_count,
                }),
            ),
            Err(e) => envelope::classify("generate image", None, e),
        };
        Ok(envelope::to_result(result))
    }
}

// === Video Generation Tools ===

/// Tool for generating videos from text prompts using Runway.
pub struct GenerateVideoFromTextTool;

#[async_trait]
impl ToolSpec for GenerateVideoFromTextTool {
    fn name(&self) -> &'static str {
        "GenerateVideoFromText"
    }

    fn description(&self) -> &'static str {
        "Generate a video from a text prompt using Runway. Waits for the task to complete and returns the video URL."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "promptText": {
                    "type": "string",
                    "description": "Text prompt describing the video to generate"
                },
                "model": {
                    "type": "string",
                    "description": "Video model name",
                    "enum": ["veo3"],
                    "default": "veo3"
                },
                "ratio": {
                    "type": "string",
                    "enum": ["1280:720", "720:1280"]
                },
                "duration": {
                    "type": "integer",
                    "description": "Video duration in seconds",
                    "minimum": 5,
                    "maximum": 10
                },
                "seed": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 4294967295u64
                }
            },
            "required": ["promptText"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let prompt_text = required_str(&input, "promptText")?.to_string();
        let model = optional_str(&input, "model")?
            .unwrap_or(DEFAULT_TEXT_TO_VIDEO_MODEL)
            .to_string();
        let ratio = owned(optional_str(&input, "ratio")?);
        let duration = optional_u64(&input, "duration")?;
        let seed = optional_u64(&input, "seed")?;

        let client = context.client()?;
        let options = video::TextToVideoOptions {
            model: model.clone(),
            prompt_text: prompt_text.clone(),
            ratio: ratio.clone(),
            duration,
            seed,
        };

        let result = match video::text_to_video(client, options).await {
            Ok(task) => envelope::generation_success(
                &task,
                "videoUrl",
                json!({
                    "promptText": prompt_text,
                    "model": model,
                    "ratio": ratio,
                    "duration": duration,
                    "seed": seed,
                }),
            ),
            Err(e) => envelope::classify("generate video", None, e),
        };
        Ok(envelope::to_result(result))
    }
}

/// Tool for animating a still image into a video using Runway.
pub struct GenerateVideoFromImageTool;

#[async_trait]
impl ToolSpec for GenerateVideoFromImageTool {
    fn name(&self) -> &'static str {
        "GenerateVideoFromImage"
    }

    fn description(&self) -> &'static str {
        "Generate a video from a source image using Runway. Waits for the task to complete and returns the video URL."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "promptImage": {
                    "type": "string",
                    "description": "HTTPS URL or data URI of the first-frame image"
                },
                "promptText": {
                    "type": "string",
                    "description": "Optional text prompt steering the motion"
                },
                "model": {
                    "type": "string",
                    "enum": ["gen4_turbo", "gen3a_turbo"],
                    "default": "gen4_turbo"
                },
                "ratio": {
                    "type": "string",
                    "enum": [
                        "1280:720", "720:1280", "1104:832", "832:1104",
                        "960:960", "1584:672"
                    ]
                },
                "duration": {
                    "type": "integer",
                    "minimum": 5,
                    "maximum": 10
                },
                "seed": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 4294967295u64
                }
            },
            "required": ["promptImage"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let prompt_image = required_str(&input, "promptImage")?.to_string();
        let prompt_text = owned(optional_str(&input, "promptText")?);
        let model = optional_str(&input, "model")?
            .unwrap_or(DEFAULT_IMAGE_TO_VIDEO_MODEL)
            .to_string();
        let ratio = owned(optional_str(&input, "ratio")?);
        let duration = optional_u64(&input, "duration")?;
        let seed = optional_u64(&input, "seed")?;

        let client = context.client()?;
        let options = video::ImageToVideoOptions {
            model: model.clone(),
            prompt_image,
            prompt_text: prompt_text.clone(),
            ratio: ratio.clone(),
            duration,
            seed,
        };

        let result = match video::image_to_video(client, options).await {
            Ok(task) => envelope::generation_success(
                &task,
                "videoUrl",
                json!({
                    "promptText": prompt_text,
                    "model": model,
                    "ratio": ratio,
                    "duration": duration,
                    "seed": seed,
                }),
            ),
            Err(e) => envelope::classify("generate video", None, e),
        };
        Ok(envelope::to_result(result))
    }
}

/// Tool for restyling an existing video using Runway.
pub struct GenerateVideoFromVideoTool;

#[async_trait]
impl ToolSpec for GenerateVideoFromVideoTool {
    fn name(&self) -> &'static str {
        "GenerateVideoFromVideo"
    }

    fn description(&self) -> &'static str {
        "Transform an existing video with a text prompt and optional reference images using Runway. Waits for the task to complete and returns the video URL."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "promptVideo": {
                    "type": "string",
                    "description": "HTTPS URL or data URI of the source video"
                },
                "promptText": {
                    "type": "string",
                    "description": "Text prompt describing the transformation"
                },
                "referenceImages": {
                    "type": "array",
                    "description": "Optional reference images guiding the transformation",
                    "maxItems": 4,
                    "items": {
                        "type": "object",
                        "properties": {
                            "uri": { "type": "string" },
                            "tag": { "type": "string" }
                        },
                        "required": ["uri"]
                    }
                },
                "model": {
                    "type": "string",
                    "enum": ["gen4_aleph"],
                    "default": "gen4_aleph"
                },
                "ratio": {
                    "type": "string",
                    "enum": [
                        "1280:720", "720:1280", "1104:832", "832:1104",
                        "960:960", "1584:672"
                    ]
                },
                "duration": {
                    "type": "integer",
                    "minimum": 5,
                    "maximum": 10
                },
                "seed": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 4294967295u64
                }
            },
            "required": ["promptVideo", "promptText"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let prompt_video = required_str(&input, "promptVideo")?.to_string();
        let prompt_text = required_str(&input, "promptText")?.to_string();
        let references = parse_reference_images(&input, "referenceImages", false)?;
        let model = optional_str(&input, "model")?
            .unwrap_or(DEFAULT_VIDEO_TO_VIDEO_MODEL)
            .to_string();
        let ratio = owned(optional_str(&input, "ratio")?);
        let duration = optional_u64(&input, "duration")?;
        let seed = optional_u64(&input, "seed")?;

        let client = context.client()?;
        let options = video::VideoToVideoOptions {
            model: model.clone(),
            video_uri: prompt_video,
            prompt_text: prompt_text.clone(),
            references,
            ratio: ratio.clone(),
            duration,
            seed,
        };

        let result = match video::video_to_video(client, options).await {
            Ok(task) => envelope::generation_success(
                &task,
                "videoUrl",
                json!({
                    "promptText": prompt_text,
                    "model": model,
                    "ratio": ratio,
                    "duration": duration,
                    "seed": seed,
                }),
            ),
            Err(e) => envelope::classify("generate video", None, e),
        };
        Ok(envelope::to_result(result))
    }
}

/// Tool for upscaling a video to a higher resolution using Runway.
pub struct UpscaleVideoTool;

#[async_trait]
impl ToolSpec for UpscaleVideoTool {
    fn name(&self) -> &'static str {
        "UpscaleVideo"
    }

    fn description(&self) -> &'static str {
        "Upscale a video up to 4x its original resolution using Runway. Waits for the task to complete and returns the video URL."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "promptVideo": {
                    "type": "string",
                    "description": "HTTPS URL or data URI of the video to upscale"
                },
                "model": {
                    "type": "string",
                    "enum": ["upscale_v1"],
                    "default": "upscale_v1"
                }
            },
            "required": ["promptVideo"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let prompt_video = required_str(&input, "promptVideo")?.to_string();
        let model = optional_str(&input, "model")?
            .unwrap_or(DEFAULT_UPSCALE_MODEL)
            .to_string();

        let client = context.client()?;
        let options = video::VideoUpscaleOptions {
            model: model.clone(),
            video_uri: prompt_video,
        };

        let result = match video::video_upscale(client, options).await {
            Ok(task) => {
                envelope::generation_success(&task, "videoUrl", json!({ "model": model }))
            }
            Err(e) => envelope::classify("upscale video", None, e),
        };
        Ok(envelope::to_result(result))
    }
}

// === Task Lifecycle Tools ===

/// Tool for querying the status of a Runway task by id.
pub struct GetTaskStatusTool;

#[async_trait]
impl ToolSpec for GetTaskStatusTool {
    fn name(&self) -> &'static str {
        "GetTaskStatus"
    }

    fn description(&self) -> &'static str {
        "Get the current status of a Runway task by its id. Returns immediately without waiting for completion."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "taskId": {
                    "type": "string",
                    "description": "The task id returned from a generation operation"
                }
            },
            "required": ["taskId"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network, ToolCapability::ReadOnly]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let task_id = required_str(&input, "taskId")?.to_string();

        let client = context.client()?;
        let result = match tasks::retrieve(client, &task_id).await {
            Ok(task) => envelope::task_status_success(&task),
            Err(e) => envelope::classify("retrieve task", Some(&task_id), e),
        };
        Ok(envelope::to_result(result))
    }
}

/// Tool reporting that task listing is unavailable.
///
/// The Runway API has no list endpoint; this tool exists so hosts that
/// probe for it get a deterministic, explicit answer instead of a missing
/// operation. It never performs a vendor call.
pub struct ListTasksTool;

#[async_trait]
impl ToolSpec for ListTasksTool {
    fn name(&self) -> &'static str {
        "ListTasks"
    }

    fn description(&self) -> &'static str {
        "List recent Runway tasks. Not supported by the Runway API; always returns an explicit unsupported response."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of tasks to return (capped at 100)",
                    "minimum": 1,
                    "maximum": 100
                },
                "status": {
                    "type": "string",
                    "description": "Filter by task status",
                    "enum": ["PENDING", "THROTTLED", "RUNNING", "SUCCEEDED", "FAILED", "CANCELLED"]
                },
                "cursor": {
                    "type": "string",
                    "description": "Pagination cursor from a previous call"
                }
            }
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::ReadOnly]
    }

    async fn execute(&self, input: Value, _context: &ToolContext) -> Result<ToolResult, ToolError> {
        // Parsed and clamped so the declared constraint holds if the vendor
        // ever grows a list endpoint; unused until then.
        let _limit = clamped_limit(&input)?;

        let mut result = envelope::failure("ListTasks is not supported by the Runway API");
        result["message"] = json!(
            "The Runway API does not provide a task listing endpoint; track task ids from generation results instead."
        );
        Ok(envelope::to_result(result))
    }
}

/// Tool for canceling a Runway task by id.
pub struct CancelTaskTool;

#[async_trait]
impl ToolSpec for CancelTaskTool {
    fn name(&self) -> &'static str {
        "CancelTask"
    }

    fn description(&self) -> &'static str {
        "Cancel a pending or running Runway task by its id. Tasks already in a terminal state cannot be canceled."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "taskId": {
                    "type": "string",
                    "description": "The task id to cancel"
                }
            },
            "required": ["taskId"]
        })
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Network]
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let task_id = required_str(&input, "taskId")?.to_string();

        let client = context.client()?;
        let result = match tasks::cancel(client, &task_id).await {
            Ok(_) => envelope::cancel_success(&task_id),
            Err(e) => envelope::classify("cancel task", Some(&task_id), e),
        };
        Ok(envelope::to_result(result))
    }
}

// === Unit Tests ===

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_image_tool_properties() {
        let tool = GenerateImageTool;
        assert_eq!(tool.name(), "GenerateImage");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_generate_image_with_references_tool_properties() {
        let tool = GenerateImageWithReferencesTool;
        assert_eq!(tool.name(), "GenerateImageWithReferences");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_generate_video_from_text_tool_properties() {
        let tool = GenerateVideoFromTextTool;
        assert_eq!(tool.name(), "GenerateVideoFromText");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_generate_video_from_image_tool_properties() {
        let tool = GenerateVideoFromImageTool;
        assert_eq!(tool.name(), "GenerateVideoFromImage");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_generate_video_from_video_tool_properties() {
        let tool = GenerateVideoFromVideoTool;
        assert_eq!(tool.name(), "GenerateVideoFromVideo");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_upscale_video_tool_properties() {
        let tool = UpscaleVideoTool;
        assert_eq!(tool.name(), "UpscaleVideo");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_get_task_status_tool_properties() {
        let tool = GetTaskStatusTool;
        assert_eq!(tool.name(), "GetTaskStatus");
        assert!(tool.is_read_only());
    }

    #[test]
    fn test_list_tasks_tool_properties() {
        let tool = ListTasksTool;
        assert_eq!(tool.name(), "ListTasks");
        assert!(tool.is_read_only());
    }

    #[test]
    fn test_cancel_task_tool_properties() {
        let tool = CancelTaskTool;
        assert_eq!(tool.name(), "CancelTask");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_generate_image_tool_schema() {
        let tool = GenerateImageTool;
        let schema = tool.input_schema();
        assert!(schema.is_object());
        let required = schema.get("required").unwrap().as_array().unwrap();
        assert!(required.iter().any(|v| v.as_str() == Some("promptText")));
    }

    #[test]
    fn test_parse_reference_images_well_formed() {
        let input = json!({
            "referenceImages": [
                {"uri": "https://example.com/a.png", "tag": "a"},
                {"uri": "https://example.com/b.png"},
                {"uri": "https://example.com/c.png"},
                {"uri": "https://example.com/d.png"}
            ]
        });
        let images = parse_reference_images(&input, "referenceImages", true).expect("valid");
        assert_eq!(images.len(), 4);
        assert_eq!(images[0].tag.as_deref(), Some("a"));
        assert_eq!(images[1].tag, None);
    }

    #[test]
    fn test_parse_reference_images_missing_when_required() {
        let err = parse_reference_images(&json!({}), "referenceImages", true).expect_err("missing");
        assert_eq!(err.to_string(), "referenceImages is required");
    }

    #[test]
    fn test_parse_reference_images_empty_list_rejected() {
        let input = json!({"referenceImages": []});
        let err = parse_reference_images(&input, "referenceImages", true).expect_err("empty");
        assert_eq!(
            err.to_string(),
            "referenceImages must contain at least one entry"
        );
    }

    #[test]
    fn test_parse_reference_images_index_identifying_error() {
        let input = json!({
            "referenceImages": [
                {"uri": "https://example.com/a.png"},
                {"tag": "no-uri"}
            ]
        });
        let err = parse_reference_images(&input, "referenceImages", true).expect_err("bad entry");
        assert_eq!(
            err.to_string(),
            "referenceImages[1] is missing required field 'uri'"
        );
    }

    #[test]
    fn test_parse_reference_images_over_limit() {
        let entries: Vec<Value> = (0..5)
            .map(|i| json!({"uri": format!("https://example.com/{i}.png")}))
            .collect();
        let input = json!({ "referenceImages": entries });
        let err = parse_reference_images(&input, "referenceImages", true).expect_err("too many");
        assert_eq!(err.to_string(), "referenceImages supports at most 4 entries");
    }

    #[test]
    fn test_parse_reference_images_optional_absent() {
        let images = parse_reference_images(&json!({}), "referenceImages", false).expect("empty");
        assert!(images.is_empty());
    }

    #[test]
    fn test_clamped_limit() {
        assert_eq!(clamped_limit(&json!({"limit": 25})).unwrap(), Some(25));
        assert_eq!(clamped_limit(&json!({"limit": 500})).unwrap(), Some(100));
        assert_eq!(clamped_limit(&json!({})).unwrap(), None);

        let err = clamped_limit(&json!({"limit": "ten"})).expect_err("mistyped");
        assert_eq!(err.to_string(), "limit must be a non-negative integer");
    }
}
