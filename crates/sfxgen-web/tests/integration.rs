use async_trait::async_trait;
use sfxgen_core::{DeviceKind, EngineError, GenerateError, GeneratedAudio, GenerationRequest};
use sfxgen_engine::{AdapterSettings, InferenceAdapter, NullEngine, SoundGenerator};
use sfxgen_web::AppState;
use std::sync::{Arc, Mutex};

// ── Stub generators ────────────────────────────────────────────────

/// Records every request and answers with silence, or fails like a device.
struct RecordingGenerator {
    requests: Mutex<Vec<GenerationRequest>>,
    fail: bool,
}

impl RecordingGenerator {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            fail,
        })
    }

    fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SoundGenerator for RecordingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAudio, GenerateError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(EngineError::InferenceFailed("CUDA out of memory".to_string()).into());
        }
        Ok(GeneratedAudio {
            sample_rate: 16000,
            samples: vec![0.0; (request.duration_secs * 16000.0) as usize],
        })
    }

    fn engine_name(&self) -> &str {
        "recording"
    }

    fn device(&self) -> DeviceKind {
        DeviceKind::Cuda
    }
}

async fn spawn_app(generator: Arc<dyn SoundGenerator>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(generator);
    tokio::spawn(async move {
        sfxgen_web::serve(listener, state, std::future::pending())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

fn null_adapter() -> Arc<dyn SoundGenerator> {
    Arc::new(InferenceAdapter::new(
        Box::new(NullEngine::new()),
        AdapterSettings::default(),
    ))
}

// ── Page ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_index_renders_default_controls() {
    let base = spawn_app(null_adapter()).await;
    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"name="duration" min="1" max="10" step="0.5" value="5""#));
    assert!(html.contains(r#"name="guidance" min="0" max="5" step="0.5" value="2.5""#));
    assert!(html.contains(r#"name="candidates" value="1""#));
    assert!(html.contains("Laser gun shot, sci-fi, pew pew sound"));
    assert!(!html.contains("<audio"));
}

#[tokio::test]
async fn test_example_selection_fills_prompt_without_generating() {
    let generator = RecordingGenerator::new(false);
    let base = spawn_app(generator.clone()).await;

    let html = reqwest::get(format!(
        "{base}/?prompt=old&duration=3&guidance=1&example=2"
    ))
    .await
    .unwrap()
    .text()
    .await
    .unwrap();

    assert!(html.contains(">Collecting a gold coin, retro game style</textarea>"));
    assert!(html.contains(r#"name="duration" min="1" max="10" step="0.5" value="3""#));
    assert!(html.contains(r#"name="guidance" min="0" max="5" step="0.5" value="1""#));
    assert!(!html.contains("<audio"));
    assert!(generator.requests().is_empty());
}

#[tokio::test]
async fn test_choosing_example_after_generation_stays_on_page() {
    let generator = RecordingGenerator::new(false);
    let base = spawn_app(generator.clone()).await;

    let html = reqwest::Client::new()
        .post(format!("{base}/generate"))
        .form(&[("prompt", "rain"), ("duration", "1"), ("guidance", "2.5")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("<audio controls"));

    // Examples are filled in by the page script; nothing submits the form
    // or leaves the page, so the rendered clip stays where it is.
    assert!(!html.contains("formaction"));
    assert!(html.contains(
        r#"<a class="example" href="/?example=0" data-prompt="Laser gun shot, sci-fi, pew pew sound">"#
    ));
    assert!(html.contains("event.preventDefault();"));
    assert!(html.contains("document.getElementById('prompt').value = link.dataset.prompt;"));
    assert_eq!(generator.requests().len(), 1);
}

#[tokio::test]
async fn test_unknown_example_keeps_prompt() {
    let base = spawn_app(null_adapter()).await;
    let html = reqwest::get(format!("{base}/?prompt=rain&example=42"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(">rain</textarea>"));
}

#[tokio::test]
async fn test_generate_ignores_client_candidate_count() {
    let generator = RecordingGenerator::new(false);
    let base = spawn_app(generator.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/generate"))
        .form(&[
            ("prompt", "Footsteps on gravel, slow walking"),
            ("duration", "2.5"),
            ("guidance", "3"),
            ("candidates", "4"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("<audio controls autoplay src=\"data:audio/wav;base64,"));
    assert!(html.contains("2.5 s at 16000 Hz"));

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "Footsteps on gravel, slow walking");
    assert_eq!(requests[0].duration_secs, 2.5);
    assert_eq!(requests[0].guidance_scale, 3.0);
    assert_eq!(requests[0].candidate_count, 1);
}

#[tokio::test]
async fn test_generate_laser_scenario_through_adapter() {
    let base = spawn_app(null_adapter()).await;
    let html = reqwest::Client::new()
        .post(format!("{base}/generate"))
        .form(&[
            ("prompt", "Laser gun shot, sci-fi, pew pew sound"),
            ("duration", "5"),
            ("guidance", "2.5"),
            ("candidates", "1"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("5.0 s at 16000 Hz"));
    assert!(html.contains(r#"download="sfx.wav""#));
    assert!(html.contains(">Laser gun shot, sci-fi, pew pew sound</textarea>"));
}

#[tokio::test]
async fn test_device_failure_shows_error_and_no_audio() {
    let base = spawn_app(RecordingGenerator::new(true)).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/generate"))
        .form(&[("prompt", "explosion"), ("duration", "10"), ("guidance", "5")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Generation failed: inference failed: CUDA out of memory"));
    assert!(!html.contains("<audio"));
    assert!(html.contains(">explosion</textarea>"));
}

#[tokio::test]
async fn test_generate_with_unparseable_slider_reports_error() {
    let generator = RecordingGenerator::new(false);
    let base = spawn_app(generator.clone()).await;
    let html = reqwest::Client::new()
        .post(format!("{base}/generate"))
        .form(&[("prompt", "wind"), ("duration", "long"), ("guidance", "2.5")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("duration must be a number, got &quot;long&quot;"));
    assert!(generator.requests().is_empty());
}

// ── JSON API ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_generate_returns_wav() {
    let base = spawn_app(null_adapter()).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&serde_json::json!({
            "prompt": "Laser gun shot, sci-fi, pew pew sound",
            "duration": 5.0,
            "guidance_scale": 2.5
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "audio/wav");
    assert_eq!(response.headers()["x-sample-rate"], "16000");
    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(bytes.len(), 44 + 80000 * 2);
}

#[tokio::test]
async fn test_api_generate_defaults_missing_sliders() {
    let generator = RecordingGenerator::new(false);
    let base = spawn_app(generator.clone()).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&serde_json::json!({ "prompt": "coin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let requests = generator.requests();
    assert_eq!(requests[0].duration_secs, 5.0);
    assert_eq!(requests[0].guidance_scale, 2.5);
}

#[tokio::test]
async fn test_api_generate_rejects_out_of_range() {
    let base = spawn_app(null_adapter()).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&serde_json::json!({ "prompt": "thunder", "duration": 12.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("duration 12s"));
}

#[tokio::test]
async fn test_api_generate_engine_failure_is_500() {
    let base = spawn_app(RecordingGenerator::new(true)).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&serde_json::json!({ "prompt": "thunder" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "inference failed: CUDA out of memory");
}

#[tokio::test]
async fn test_api_generate_malformed_json_is_json_error() {
    let base = spawn_app(null_adapter()).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .header("content-type", "application/json")
        .body("{\"duration\": 5}")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_api_controls() {
    let base = spawn_app(null_adapter()).await;
    let body: serde_json::Value = reqwest::get(format!("{base}/api/controls"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["duration"]["min"], 1.0);
    assert_eq!(body["duration"]["max"], 10.0);
    assert_eq!(body["guidance"]["default"], 2.5);
    assert_eq!(body["candidate_count"], 1);
    assert_eq!(body["examples"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_health_reports_engine_and_device() {
    let base = spawn_app(RecordingGenerator::new(false)).await;
    let body: serde_json::Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["engine"], "recording");
    assert_eq!(body["device"], "cuda");
}

#[tokio::test]
async fn test_request_id_is_propagated_through_generation() {
    let base = spawn_app(null_adapter()).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .header("x-request-id", "sfx-gen-7")
        .json(&serde_json::json!({ "prompt": "coin", "duration": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-request-id"], "sfx-gen-7");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let base = spawn_app(null_adapter()).await;
    let response = reqwest::Client::new()
        .get(format!("{base}/health"))
        .header("x-request-id", "sfx-test-123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "sfx-test-123");
}
