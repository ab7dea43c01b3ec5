//! Route handlers for the page and the JSON API.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Form, Json, Query, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use sfxgen_core::controls::{describe_controls, ControlsDescription, CANDIDATE_COUNT};
use sfxgen_core::{GenerationRequest, DURATION_CONTROL, GUIDANCE_CONTROL};

use crate::app::{parse_control, FormState, PageAction, PageState};
use crate::error::ApiError;
use crate::request_context::RequestContext;
use crate::state::AppState;
use crate::ui::render_page;
use crate::wav::{write_wav_bytes, AudioClip};

const SAMPLE_RATE_HEADER: &str = "x-sample-rate";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub prompt: Option<String>,
    pub duration: Option<String>,
    pub guidance: Option<String>,
    pub example: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    pub duration: Option<String>,
    pub guidance: Option<String>,
    pub candidates: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiGenerateRequest {
    pub prompt: String,
    pub duration: Option<f32>,
    pub guidance_scale: Option<f32>,
}

/// `GET /`
pub async fn index(Query(query): Query<PageQuery>) -> Html<String> {
    let mut form = FormState::prefill(
        query.prompt.as_deref(),
        query.duration.as_deref(),
        query.guidance.as_deref(),
    );

    if let Some(index) = query.example.as_deref().and_then(|e| e.trim().parse::<usize>().ok()) {
        form.select_example(index);
        tracing::debug!(index, prompt = %form.prompt, "example selected");
    }

    Html(render_page(&PageState::new(form)))
}

/// `POST /generate`
pub async fn generate_page(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Form(submitted): Form<GenerateForm>,
) -> Html<String> {
    if let Some(ref raw) = submitted.candidates {
        if raw.trim() != CANDIDATE_COUNT.to_string() {
            tracing::debug!(candidates = %raw, "ignoring client candidate count");
        }
    }

    let parsed = parse_control(submitted.duration.as_deref(), &DURATION_CONTROL).and_then(
        |duration| {
            parse_control(submitted.guidance.as_deref(), &GUIDANCE_CONTROL)
                .map(|guidance| (duration, guidance))
        },
    );

    let (duration, guidance) = match parsed {
        Ok(values) => values,
        Err(message) => {
            let form = FormState::prefill(
                Some(&submitted.prompt),
                submitted.duration.as_deref(),
                submitted.guidance.as_deref(),
            );
            let mut page = PageState::new(form);
            page.finish(Err(message));
            return Html(render_page(&page));
        }
    };

    let form = FormState {
        prompt: submitted.prompt,
        duration,
        guidance,
    };
    let mut page = PageState::new(form);

    if let PageAction::Generate(request) = page.form.submit() {
        tracing::info!(
            request_id = %ctx.request_id,
            duration_secs = request.duration_secs,
            guidance_scale = request.guidance_scale,
            "page generation requested"
        );
        let outcome = match state.generator.generate(&request).await {
            Ok(audio) => AudioClip::from_audio(&audio).map_err(|e| format!("WAV encoding failed: {e}")),
            Err(e) => {
                tracing::warn!(request_id = %ctx.request_id, "generation failed: {e}");
                Err(e.to_string())
            }
        };
        page.finish(outcome);
    }

    Html(render_page(&page))
}

/// `POST /api/generate`
pub async fn api_generate(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<ApiGenerateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    let request = GenerationRequest::new(
        body.prompt,
        body.duration.unwrap_or(DURATION_CONTROL.default),
        body.guidance_scale.unwrap_or(GUIDANCE_CONTROL.default),
    );
    tracing::info!(
        request_id = %ctx.request_id,
        duration_secs = request.duration_secs,
        guidance_scale = request.guidance_scale,
        "api generation requested"
    );
    let audio = state.generator.generate(&request).await.map_err(|e| {
        tracing::warn!(request_id = %ctx.request_id, "generation failed: {e}");
        ApiError::from(e)
    })?;
    let bytes = write_wav_bytes(&audio.samples, audio.sample_rate)
        .map_err(|e| ApiError::internal(format!("WAV encoding failed: {e}")))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("audio/wav"))
        .header(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"sfx.wav\""),
        )
        .header(
            HeaderName::from_static(SAMPLE_RATE_HEADER),
            HeaderValue::from(audio.sample_rate),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// `GET /api/controls`
pub async fn api_controls() -> Json<ControlsDescription> {
    Json(describe_controls())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "engine": state.generator.engine_name(),
        "device": state.generator.device().to_string(),
    }))
}
