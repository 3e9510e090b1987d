//! Deadlines for runtime calls

use cdd_provider::{ProviderError, Result};
use std::future::Future;
use std::time::Duration;

/// Run a runtime call under a deadline; an elapsed deadline becomes `ProviderError::Timeout`
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout),
    }
}
