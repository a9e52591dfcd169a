//! Video generation and upscaling API wrappers for Runway.

use serde_json::{Value, json};

use crate::client::{RunwayClient, RunwayError};
use crate::modules::image::ReferenceImage;
use crate::modules::tasks;

// === Types ===

/// Options for a text-to-video request.
#[derive(Debug, Clone)]
pub struct TextToVideoOptions {
    pub model: String,
    pub prompt_text: String,
    pub ratio: Option<String>,
    pub duration: Option<u64>,
    pub seed: Option<u64>,
}

/// Options for an image-to-video request.
#[derive(Debug, Clone)]
pub struct ImageToVideoOptions {
    pub model: String,
    pub prompt_image: String,
    pub prompt_text: Option<String>,
    pub ratio: Option<String>,
    pub duration: Option<u64>,
    pub seed: Option<u64>,
}

/// Options for a video-to-video request.
#[derive(Debug, Clone)]
pub struct VideoToVideoOptions {
    pub model: String,
    pub video_uri: String,
    pub prompt_text: String,
    pub references: Vec<ReferenceImage>,
    pub ratio: Option<String>,
    pub duration: Option<u64>,
    pub seed: Option<u64>,
}

/// Options for a video upscale request.
#[derive(Debug, Clone)]
pub struct VideoUpscaleOptions {
    pub model: String,
    pub video_uri: String,
}

// === API Calls ===

/// Submit a text-to-video request and wait for the task to finish.
pub async fn text_to_video(
    client: &RunwayClient,
    options: TextToVideoOptions,
) -> Result<Value, RunwayError> {
    let mut body = json!({
        "model": options.model,
        "promptText": options.prompt_text,
    });
    apply_common_fields(&mut body, options.ratio, options.duration, options.seed);

    tasks::submit_and_wait(client, "/v1/text_to_video", &body).await
}

/// Submit an image-to-video request and wait for the task to finish.
pub async fn image_to_video(
    client: &RunwayClient,
    options: ImageToVideoOptions,
) -> Result<Value, RunwayError> {
    let mut body = json!({
        "model": options.model,
        "promptImage": options.prompt_image,
    });
    if let Some(prompt_text) = options.prompt_text {
        body["promptText"] = json!(prompt_text);
    }
    apply_common_fields(&mut body, options.ratio, options.duration, options.seed);

    tasks::submit_and_wait(client, "/v1/image_to_video", &body).await
}

/// Submit a video-to-video request and wait for the task to finish.
pub async fn video_to_video(
    client: &RunwayClient,
    options: VideoToVideoOptions,
) -> Result<Value, RunwayError> {
    let mut body = json!({
        "model": options.model,
        "videoUri": options.video_uri,
        "promptText": options.prompt_text,
    });
    if !options.references.is_empty() {
        let references: Vec<Value> = options
            .references
            .iter()
            .map(|reference| {
                let mut entry = json!({ "type": "image", "uri": reference.uri });
                if let Some(tag) = &reference.tag {
                    entry["tag"] = json!(tag);
                }
                entry
            })
            .collect();
        body["references"] = json!(references);
    }
    apply_common_fields(&mut body, options.ratio, options.duration, options.seed);

    tasks::submit_and_wait(client, "/v1/video_to_video", &body).await
}

/// Submit a video upscale request and wait for the task to finish.
pub async fn video_upscale(
    client: &RunwayClient,
    options: VideoUpscaleOptions,
) -> Result<Value, RunwayError> {
    let body = json!({
        "model": options.model,
        "videoUri": options.video_uri,
    });

    tasks::submit_and_wait(client, "/v1/video_upscale", &body).await
}

fn apply_common_fields(
    body: &mut Value,
    ratio: Option<String>,
    duration: Option<u64>,
    seed: Option<u64>,
) {
    if let Some(ratio) = ratio {
        body["ratio"] = json!(ratio);
    }
    if let Some(duration) = duration {
        body["duration"] = json!(duration);
    }
    if let Some(seed) = seed {
        body["seed"] = json!(seed);
    }
}

// === Unit Tests ===

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for_base_url(base_url: String) -> RunwayClient {
        let config = Config {
            api_secret: Some("key_test".to_string()),
            base_url: Some(base_url),
            ..Config::default()
        };
        RunwayClient::new(&config).expect("create client")
    }

    #[tokio::test]
    async fn image_to_video_submits_and_waits() {
        let server = MockServer::start().await;
        let task_id = "task-vid-1";

        Mock::given(method("POST"))
            .and(path("/v1/image_to_video"))
            .and(body_partial_json(json!({
                "model": "gen4_turbo",
                "promptImage": "https://example.com/frame.png",
                "duration": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": task_id})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/tasks/{task_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": task_id,
                "status": "SUCCEEDED",
                "output": ["https://cdn.example/clip.mp4"]
            })))
            .mount(&server)
            .await;

        let client = client_for_base_url(server.uri());
        let options = ImageToVideoOptions {
            model: "gen4_turbo".to_string(),
            prompt_image: "https://example.com/frame.png".to_string(),
            prompt_text: Some("slow pan".to_string()),
            ratio: Some("1280:720".to_string()),
            duration: Some(5),
            seed: None,
        };

        let task = image_to_video(&client, options).await.expect("generate");
        assert_eq!(
            tasks::first_output(&task).as_deref(),
            Some("https://cdn.example/clip.mp4")
        );
    }

    #[tokio::test]
    async fn video_to_video_sends_typed_references() {
        let server = MockServer::start().await;
        let task_id = "task-vid-2";

        Mock::given(method("POST"))
            .and(path("/v1/video_to_video"))
            .and(body_partial_json(json!({
                "model": "gen4_aleph",
                "videoUri": "https://example.com/in.mp4",
                "references": [{"type": "image", "uri": "https://example.com/style.png", "tag": "style"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": task_id})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/tasks/{task_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": task_id,
                "status": "SUCCEEDED",
                "output": ["https://cdn.example/out.mp4"]
            })))
            .mount(&server)
            .await;

        let client = client_for_base_url(server.uri());
        let options = VideoToVideoOptions {
            model: "gen4_aleph".to_string(),
            video_uri: "https://example.com/in.mp4".to_string(),
            prompt_text: "make it winter".to_string(),
            references: vec![ReferenceImage {
                uri: "https://example.com/style.png".to_string(),
                tag: Some("style".to_string()),
            }],
            ratio: None,
            duration: None,
            seed: None,
        };

        let task = video_to_video(&client, options).await.expect("generate");
        assert_eq!(tasks::extract_status(&task).as_deref(), Some("SUCCEEDED"));
    }
}
