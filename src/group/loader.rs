//! Loader capability
//!
//! The loader is the backing store consulted on a confirmed miss. Its errors are passed
//! to the caller with their message intact.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> Result<Vec<u8>>;
}

/// Adapts a plain function into a `Loader`.
pub struct LoaderFn<F>(F);

impl<F> LoaderFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }

    pub fn shared(f: F) -> Arc<dyn Loader> {
        Arc::new(Self(f))
    }
}

#[async_trait]
impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    async fn load(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}
