use async_trait::async_trait;
use sfxgen_core::{DeviceKind, EngineError, PipelineCall, PipelineOutput};

/// A text-to-audio pipeline backend.
///
/// Implementations are created through [`EngineRegistry`](crate::EngineRegistry),
/// initialized exactly once, and then driven by the
/// [`InferenceAdapter`](crate::InferenceAdapter), which never runs two calls at once.
#[async_trait]
pub trait SfxEngine: Send + Sync {
    /// Returns the engine's registry name (e.g. `"null"`, `"remote"`).
    fn name(&self) -> &str;
    /// Load the model named by `model_id` in `config` onto a device.
    async fn initialize(&mut self, config: toml::Value) -> Result<(), EngineError>;
    /// Device the pipeline is bound to. Only meaningful after `initialize`.
    fn device(&self) -> DeviceKind;
    /// Run one pipeline call to completion.
    async fn run(&self, call: &PipelineCall) -> Result<PipelineOutput, EngineError>;
    /// Release the pipeline.
    async fn shutdown(&self) -> Result<(), EngineError>;
}
