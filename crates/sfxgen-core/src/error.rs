use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A request that the pipeline must never see.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("duration {0}s is outside [{1}, {2}]")]
    DurationOutOfRange(f32, f32, f32),

    #[error("guidance scale {0} is outside [{1}, {2}]")]
    GuidanceOutOfRange(f32, f32, f32),

    #[error("candidate count must be at least 1, got {0}")]
    InvalidCandidateCount(u32),

    #[error("prompt is {0} characters, limit is {1}")]
    PromptTooLong(usize, usize),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("pipeline initialization failed: {0}")]
    InitializationFailed(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("pipeline returned no waveforms")]
    EmptyOutput,

    #[error("pipeline produced {actual} Hz audio, expected {expected} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("engine not found: {0}")]
    EngineNotFound(String),
}

/// Failure of a single `generate` call.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid request: {0}")]
    Invalid(#[from] RequestError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
