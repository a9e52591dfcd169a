//! End-to-end tool invocation tests against a mock Runway server.

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use runway_tools::config::Config;
use runway_tools::tools::{ToolContext, ToolError, ToolRegistry, ToolRegistryBuilder};

fn registry_for(server: &MockServer) -> ToolRegistry {
    let config = Config {
        api_secret: Some("key_test".to_string()),
        base_url: Some(server.uri()),
        ..Config::default()
    };
    ToolRegistryBuilder::new()
        .with_runway_tools()
        .build(ToolContext::new(config))
}

fn registry_without_credential() -> ToolRegistry {
    ToolRegistryBuilder::new()
        .with_runway_tools()
        .build(ToolContext::new(Config::default()))
}

fn envelope_of(result: &runway_tools::tools::ToolResult) -> Value {
    result.metadata.clone().expect("envelope metadata")
}

async fn mount_task(server: &MockServer, task_id: &str, task: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/tasks/{task_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(task))
        .mount(server)
        .await;
}

#[tokio::test]
async fn generate_image_happy_path() {
    let server = MockServer::start().await;
    let task_id = "task-img-1";

    Mock::given(method("POST"))
        .and(path("/v1/text_to_image"))
        .and(body_partial_json(json!({
            "model": "gen4_image",
            "promptText": "a red fox in snow"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": task_id})))
        .mount(&server)
        .await;
    mount_task(
        &server,
        task_id,
        json!({
            "id": task_id,
            "status": "SUCCEEDED",
            "createdAt": "2025-01-01T00:00:00.000Z",
            "output": ["https://cdn.example/img1.png"]
        }),
    )
    .await;

    let registry = registry_for(&server);
    let result = registry
        .execute("GenerateImage", json!({"promptText": "a red fox in snow"}))
        .await
        .expect("invoke");

    assert!(result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["taskId"], json!(task_id));
    assert_eq!(envelope["status"], json!("SUCCEEDED"));
    assert_eq!(envelope["imageUrl"], json!("https://cdn.example/img1.png"));
    assert_eq!(envelope["promptText"], json!("a red fox in snow"));
}

#[tokio::test]
async fn generate_video_from_image_rejects_missing_prompt_image() {
    let server = MockServer::start().await;
    let registry = registry_for(&server);

    let result = registry
        .execute("GenerateVideoFromImage", json!({}))
        .await
        .expect("rejection is still a result");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["error"], json!("promptImage is required"));

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.is_empty(), "no vendor call on validation failure");
}

#[tokio::test]
async fn missing_credential_fails_before_any_network_call() {
    let registry = registry_without_credential();

    let result = registry
        .execute("GenerateImage", json!({"promptText": "anything"}))
        .await
        .expect("rejection is still a result");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(
        envelope["error"],
        json!("RUNWAYML_API_SECRET environment variable is not set.")
    );
}

#[tokio::test]
async fn get_task_status_reports_unknown_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/no-such-task"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not Found"})))
        .mount(&server)
        .await;

    let registry = registry_for(&server);
    let result = registry
        .execute("GetTaskStatus", json!({"taskId": "no-such-task"}))
        .await
        .expect("invoke");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["error"], json!("Task not found"));
    assert_eq!(envelope["taskId"], json!("no-such-task"));
}

#[tokio::test]
async fn get_task_status_returns_current_state_without_waiting() {
    let server = MockServer::start().await;
    mount_task(
        &server,
        "task-running",
        json!({
            "id": "task-running",
            "status": "RUNNING",
            "createdAt": "2025-01-01T00:00:00.000Z",
            "progress": 0.4
        }),
    )
    .await;

    let registry = registry_for(&server);
    let result = registry
        .execute("GetTaskStatus", json!({"taskId": "task-running"}))
        .await
        .expect("invoke");

    assert!(result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["status"], json!("RUNNING"));
    assert_eq!(envelope["progress"], json!(0.4));

    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 1, "a status probe is a single request");
}

#[tokio::test]
async fn get_task_status_repeats_identically_for_unresolved_task() {
    let server = MockServer::start().await;
    mount_task(
        &server,
        "task-pending",
        json!({
            "id": "task-pending",
            "status": "PENDING",
            "createdAt": "2025-01-01T00:00:00.000Z"
        }),
    )
    .await;

    let registry = registry_for(&server);
    let first = registry
        .execute("GetTaskStatus", json!({"taskId": "task-pending"}))
        .await
        .expect("first probe");
    let second = registry
        .execute("GetTaskStatus", json!({"taskId": "task-pending"}))
        .await
        .expect("second probe");

    assert!(first.success && second.success);
    assert_eq!(envelope_of(&first), envelope_of(&second));
    assert_eq!(envelope_of(&first)["status"], json!("PENDING"));
}

#[tokio::test]
async fn mistyped_optional_parameter_is_rejected() {
    let server = MockServer::start().await;
    let registry = registry_for(&server);

    let result = registry
        .execute(
            "GenerateVideoFromText",
            json!({"promptText": "a storm", "duration": -1}),
        )
        .await
        .expect("rejection is still a result");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(
        envelope["error"],
        json!("duration must be a non-negative integer")
    );

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.is_empty(), "no vendor call on validation failure");
}

#[tokio::test]
async fn cancel_task_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/tasks/task-cancel"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let registry = registry_for(&server);
    let result = registry
        .execute("CancelTask", json!({"taskId": "task-cancel"}))
        .await
        .expect("invoke");

    assert!(result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["taskId"], json!("task-cancel"));
    assert_eq!(envelope["status"], json!("CANCELLED"));
}

#[tokio::test]
async fn cancel_task_reports_unknown_task() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/tasks/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not Found"})))
        .mount(&server)
        .await;

    let registry = registry_for(&server);
    let result = registry
        .execute("CancelTask", json!({"taskId": "ghost"}))
        .await
        .expect("invoke");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["error"], json!("Task not found"));
    assert_eq!(envelope["taskId"], json!("ghost"));
}

#[tokio::test]
async fn cancel_task_reports_terminal_task() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/tasks/task-done"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "task is not cancelable"})),
        )
        .mount(&server)
        .await;

    let registry = registry_for(&server);
    let result = registry
        .execute("CancelTask", json!({"taskId": "task-done"}))
        .await
        .expect("invoke");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["error"], json!("Task cannot be canceled"));
    assert_eq!(envelope["taskId"], json!("task-done"));
}

#[tokio::test]
async fn generation_failure_surfaces_task_details() {
    let server = MockServer::start().await;
    let task_id = "task-fail";

    Mock::given(method("POST"))
        .and(path("/v1/text_to_video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": task_id})))
        .mount(&server)
        .await;
    mount_task(
        &server,
        task_id,
        json!({
            "id": task_id,
            "status": "FAILED",
            "failure": "content moderation",
            "failureCode": "SAFETY.INPUT.TEXT"
        }),
    )
    .await;

    let registry = registry_for(&server);
    let result = registry
        .execute("GenerateVideoFromText", json!({"promptText": "a storm"}))
        .await
        .expect("invoke");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["error"], json!("generate video task failed"));
    assert_eq!(envelope["taskId"], json!(task_id));
    assert_eq!(envelope["details"]["failure"], json!("content moderation"));
}

#[tokio::test]
async fn reference_image_validation_identifies_offending_index() {
    let server = MockServer::start().await;
    let registry = registry_for(&server);

    let result = registry
        .execute(
            "GenerateImageWithReferences",
            json!({
                "promptText": "@fox by a river",
                "referenceImages": [
                    {"uri": "https://example.com/fox.png", "tag": "fox"},
                    {"tag": "orphan"}
                ]
            }),
        )
        .await
        .expect("invoke");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(
        envelope["error"],
        json!("referenceImages[1] is missing required field 'uri'")
    );

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.is_empty());
}

#[tokio::test]
async fn reference_images_accepts_four_entries() {
    let server = MockServer::start().await;
    let task_id = "task-ref";

    Mock::given(method("POST"))
        .and(path("/v1/text_to_image"))
        .and(body_partial_json(json!({
            "referenceImages": [
                {"uri": "https://example.com/0.png"},
                {"uri": "https://example.com/1.png"},
                {"uri": "https://example.com/2.png"},
                {"uri": "https://example.com/3.png"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": task_id})))
        .mount(&server)
        .await;
    mount_task(
        &server,
        task_id,
        json!({
            "id": task_id,
            "status": "SUCCEEDED",
            "output": ["https://cdn.example/ref.png"]
        }),
    )
    .await;

    let registry = registry_for(&server);
    let references: Vec<Value> = (0..4)
        .map(|i| json!({"uri": format!("https://example.com/{i}.png")}))
        .collect();
    let result = registry
        .execute(
            "GenerateImageWithReferences",
            json!({"promptText": "collage", "referenceImages": references}),
        )
        .await
        .expect("invoke");

    assert!(result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["imageUrl"], json!("https://cdn.example/ref.png"));
    assert_eq!(envelope["referenceImageCount"], json!(4));
}

#[tokio::test]
async fn upscale_video_happy_path() {
    let server = MockServer::start().await;
    let task_id = "task-up";

    Mock::given(method("POST"))
        .and(path("/v1/video_upscale"))
        .and(body_partial_json(json!({
            "model": "upscale_v1",
            "videoUri": "https://example.com/in.mp4"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": task_id})))
        .mount(&server)
        .await;
    mount_task(
        &server,
        task_id,
        json!({
            "id": task_id,
            "status": "SUCCEEDED",
            "output": ["https://cdn.example/4k.mp4"]
        }),
    )
    .await;

    let registry = registry_for(&server);
    let result = registry
        .execute(
            "UpscaleVideo",
            json!({"promptVideo": "https://example.com/in.mp4"}),
        )
        .await
        .expect("invoke");

    assert!(result.success);
    let envelope = envelope_of(&result);
    assert_eq!(envelope["videoUrl"], json!("https://cdn.example/4k.mp4"));
}

#[tokio::test]
async fn list_tasks_is_explicitly_unsupported() {
    let server = MockServer::start().await;
    let registry = registry_for(&server);

    let result = registry
        .execute("ListTasks", json!({"limit": 500}))
        .await
        .expect("invoke");

    assert!(!result.success);
    let envelope = envelope_of(&result);
    assert_eq!(
        envelope["error"],
        json!("ListTasks is not supported by the Runway API")
    );

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.is_empty(), "ListTasks never calls the vendor");
}

#[tokio::test]
async fn unknown_tool_name_is_a_dispatch_error() {
    let registry = registry_without_credential();

    let result = registry.execute("GenerateAudio", json!({})).await;
    assert!(matches!(result, Err(ToolError::NotAvailable { .. })));
}

#[tokio::test]
async fn discovery_order_is_deterministic() {
    let registry = registry_without_credential();

    let names: Vec<String> = registry
        .descriptors()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "GenerateImage",
            "GenerateImageWithReferences",
            "GenerateVideoFromText",
            "GenerateVideoFromImage",
            "GenerateVideoFromVideo",
            "UpscaleVideo",
            "GetTaskStatus",
            "ListTasks",
            "CancelTask",
        ]
    );
}
