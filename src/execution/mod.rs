//! The outward-facing stages of a run: post, record usage, notify.

pub mod simulated;

use crate::feed::types::Article;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a post about `article`, returning the post id.
    async fn publish(&mut self, article: &Article) -> Result<String>;
}

#[async_trait]
pub trait UsageTracker: Send + Sync {
    /// Remember that `article` has been used so it is not posted twice.
    async fn record(&mut self, article: &Article, post_id: &str) -> Result<()>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&mut self, message: &str) -> Result<()>;
}
