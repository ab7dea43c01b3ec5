use crate::engine_trait::SfxEngine;
use sfxgen_core::EngineError;
use std::collections::HashMap;

pub struct EngineRegistry {
    factories: HashMap<String, fn() -> Box<dyn SfxEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("null", || Box::new(crate::null_engine::NullEngine::new()));
        registry.register("remote", || {
            Box::new(crate::remote_engine::RemoteEngine::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn SfxEngine>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn SfxEngine>, EngineError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| EngineError::EngineNotFound(name.to_string()))
    }

    pub fn list_engines(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
