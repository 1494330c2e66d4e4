use thiserror::Error;

/// Errors raised while resolving or seeding a generator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    #[error("failed to read OS entropy for seeding: {0}")]
    Entropy(String),
}
