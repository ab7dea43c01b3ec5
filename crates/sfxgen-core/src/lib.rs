pub mod config;
pub mod controls;
pub mod error;
pub mod prompt;
pub mod types;

pub use config::AppConfig;
pub use controls::{SliderSpec, DURATION_CONTROL, EXAMPLE_PROMPTS, GUIDANCE_CONTROL};
pub use error::{ConfigError, EngineError, GenerateError, RequestError};
pub use prompt::{augment_prompt, QUALITY_SUFFIX};
pub use types::{
    DeviceKind, DevicePreference, GeneratedAudio, GenerationRequest, PipelineCall, PipelineOutput,
};
