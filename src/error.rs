use thiserror::Error;

#[derive(Error, Debug)]
pub enum AprioriError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid item: {0}")]
    InvalidItem(String),
    #[error("Empty input: at least one transaction is required")]
    EmptyInput,
    #[error("Not fitted: call generate_rules before querying the model")]
    NotFitted,
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, AprioriError>;
