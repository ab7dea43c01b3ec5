pub mod adapter;
pub mod engine_trait;
pub mod null_engine;
pub mod registry;
pub mod remote_engine;

pub use adapter::{AdapterSettings, InferenceAdapter, SoundGenerator};
pub use engine_trait::SfxEngine;
pub use null_engine::NullEngine;
pub use registry::EngineRegistry;
pub use remote_engine::RemoteEngine;
