// Factory and registry for creating model-specific reasoning parsers,
// with parser pooling for reuse across requests.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tokio::sync::Mutex;

use crate::{
    parsers::GptOssParser,
    traits::{ParseError, ReasoningParser},
};

/// Type alias for pooled parser instances.
/// Uses tokio::Mutex to avoid blocking the async executor.
pub type PooledParser = Arc<Mutex<Box<dyn ReasoningParser>>>;

/// Type alias for parser creator functions.
type ParserCreator = Arc<dyn Fn() -> Box<dyn ReasoningParser> + Send + Sync>;

/// Registry for model-specific parsers with pooling support.
#[derive(Clone)]
pub struct ParserRegistry {
    /// Creator functions for parsers (used when pool is empty)
    creators: Arc<RwLock<HashMap<String, ParserCreator>>>,
    /// Pooled parser instances for reuse
    pool: Arc<RwLock<HashMap<String, PooledParser>>>,
    /// Model pattern to parser name mappings
    patterns: Arc<RwLock<Vec<(String, String)>>>, // (pattern, parser_name)
}

impl ParserRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            creators: Arc::new(RwLock::new(HashMap::new())),
            pool: Arc::new(RwLock::new(HashMap::new())),
            patterns: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a parser creator for a given parser type.
    pub fn register_parser<F>(&self, name: &str, creator: F)
    where
        F: Fn() -> Box<dyn ReasoningParser> + Send + Sync + 'static,
    {
        let mut creators = self.creators.write().unwrap();
        creators.insert(name.to_string(), Arc::new(creator));
    }

    /// Register a model pattern to parser mapping.
    /// Patterns are checked in order, first match wins.
    pub fn register_pattern(&self, pattern: &str, parser_name: &str) {
        let mut patterns = self.patterns.write().unwrap();
        patterns.push((pattern.to_string(), parser_name.to_string()));
    }

    /// Get a pooled parser by exact name.
    /// Returns a shared parser instance from the pool, creating one if needed.
    pub fn get_pooled_parser(&self, name: &str) -> Option<PooledParser> {
        {
            let pool = self.pool.read().unwrap();
            if let Some(parser) = pool.get(name) {
                return Some(Arc::clone(parser));
            }
        }

        let creators = self.creators.read().unwrap();
        if let Some(creator) = creators.get(name) {
            let parser = Arc::new(Mutex::new(creator()));

            let mut pool = self.pool.write().unwrap();
            pool.insert(name.to_string(), Arc::clone(&parser));

            Some(parser)
        } else {
            None
        }
    }

    /// Check if a parser with the given name is registered.
    pub fn has_parser(&self, name: &str) -> bool {
        let creators = self.creators.read().unwrap();
        creators.contains_key(name)
    }

    /// Create a fresh parser instance by exact name (not pooled).
    /// Useful for streaming where state isolation is needed.
    pub fn create_parser(&self, name: &str) -> Option<Box<dyn ReasoningParser>> {
        let creators = self.creators.read().unwrap();
        creators.get(name).map(|creator| creator())
    }

    /// Resolve a model ID to a registered parser name by pattern matching.
    fn resolve_model(&self, model_id: &str) -> Option<String> {
        let patterns = self.patterns.read().unwrap();
        let model_lower = model_id.to_lowercase();

        for (pattern, parser_name) in patterns.iter() {
            if model_lower.contains(&pattern.to_lowercase()) {
                return Some(parser_name.clone());
            }
        }
        None
    }

    /// Check if a parser is registered for a specific model without creating it.
    pub fn has_parser_for_model(&self, model_id: &str) -> bool {
        self.resolve_model(model_id)
            .map(|name| self.has_parser(&name))
            .unwrap_or(false)
    }

    /// Clear the parser pool, forcing new instances to be created.
    pub fn clear_pool(&self) {
        let mut pool = self.pool.write().unwrap();
        pool.clear();
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory for creating reasoning parsers based on model type.
///
/// An unrecognized model is a configuration fault and fails at construction
/// time with [`ParseError::UnknownModel`]; there is no silent fallback that
/// would defer a broken binding into the streaming hot path.
#[derive(Clone)]
pub struct ParserFactory {
    registry: ParserRegistry,
}

impl ParserFactory {
    /// Create a new factory with the default parsers registered.
    pub fn new() -> Self {
        let registry = ParserRegistry::new();

        registry.register_parser("gpt_oss", || Box::new(GptOssParser::new()));

        registry.register_pattern("gpt-oss", "gpt_oss");
        registry.register_pattern("gpt_oss", "gpt_oss");
        registry.register_pattern("gptoss", "gpt_oss");
        registry.register_pattern("harmony", "gpt_oss");

        Self { registry }
    }

    /// Get a pooled parser for the given model ID.
    /// Returns a shared instance; callers serialize access through the mutex
    /// and must `reset()` between turns.
    pub fn get_pooled(&self, model_id: &str) -> Result<PooledParser, ParseError> {
        let name = self
            .registry
            .resolve_model(model_id)
            .ok_or_else(|| ParseError::UnknownModel(model_id.to_string()))?;
        self.registry
            .get_pooled_parser(&name)
            .ok_or_else(|| ParseError::UnknownModel(model_id.to_string()))
    }

    /// Create a fresh parser instance for the given model ID (not pooled).
    /// Use this when you need an isolated parser instance per stream.
    pub fn create(&self, model_id: &str) -> Result<Box<dyn ReasoningParser>, ParseError> {
        let name = self
            .registry
            .resolve_model(model_id)
            .ok_or_else(|| ParseError::UnknownModel(model_id.to_string()))?;
        self.registry
            .create_parser(&name)
            .ok_or_else(|| ParseError::UnknownModel(model_id.to_string()))
    }

    /// Get the internal registry for custom registration.
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Clear the parser pool.
    pub fn clear_pool(&self) {
        self.registry.clear_pool();
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
