//! Origin Loaders
//!
//! A loader produces the bytes for a key that no cache holds. It is the only
//! way values enter the cluster, so every group must have one.

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a thread-safe, asynchronous origin loader.
/// It takes the requested key and resolves to the value bytes.
pub type LoaderFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>> + Send + Sync>;

/// Wraps an async closure into a [`LoaderFn`].
pub fn loader_fn<F, Fut>(loader: F) -> LoaderFn
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    Arc::new(move |key: String| {
        Box::pin(loader(key)) as Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>
    })
}
