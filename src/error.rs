use thiserror::Error;

/// Error taxonomy for the lookup engine.
///
/// `KeyNotFound` and `InvalidConfiguration` are the only errors the core
/// produces; `ResourceFailure`/`Serialization` wrap I/O failures surfaced
/// while the benchmark driver writes its results record.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("key not found in executor `{executor}` at request index {index}")]
    KeyNotFound { executor: &'static str, index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("resource failure: {0}")]
    ResourceFailure(#[from] std::io::Error),

    #[error("result serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
