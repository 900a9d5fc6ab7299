//! Data Source Module
//!
//! The authoritative fallback a namespace cache loads from on a miss.

use async_trait::async_trait;

// == Data Source ==
/// Loads the value for a key from the system of record.
///
/// Any error is treated as a failed fetch and surfaced to the caller; the cache
/// never retries on its own.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

// == Source Fn ==
/// Adapts a plain closure into a [`DataSource`].
///
/// ```ignore
/// let source = SourceFn(|key: &str| match key {
///     "Tom" => Ok(b"630".to_vec()),
///     _ => Err(anyhow::anyhow!("{} not exist", key)),
/// });
/// ```
pub struct SourceFn<F>(pub F);

#[async_trait]
impl<F> DataSource for SourceFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}
