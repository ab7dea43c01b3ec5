use sfxgen_engine::SoundGenerator;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn SoundGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn SoundGenerator>) -> Self {
        Self { generator }
    }
}
