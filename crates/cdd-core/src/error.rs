//! Error types for cdd-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Provider error: {0}")]
    Provider(#[from] cdd_provider::ProviderError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
