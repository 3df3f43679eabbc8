pub mod mock;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::Article;

/// Where candidate articles come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&mut self, tag: &str) -> Result<Vec<Article>>;
    fn name(&self) -> &str;
}
