//! Dry-run stages: they wait out a fixed latency and never leave the process.

use super::{Notifier, Publisher, UsageTracker};
use crate::feed::types::Article;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Synthesize a post id from the current wall clock.
pub fn post_id_now() -> String {
    format!("post_{}", chrono::Utc::now().timestamp_millis())
}

pub struct SimulatedPublisher {
    latency: Duration,
}

impl SimulatedPublisher {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Publisher for SimulatedPublisher {
    async fn publish(&mut self, article: &Article) -> Result<String> {
        if article.title.trim().is_empty() {
            anyhow::bail!("article {} has no title", article.id);
        }
        if article.url.is_empty() {
            anyhow::bail!("article {} has no url", article.id);
        }

        tokio::time::sleep(self.latency).await;
        let post_id = post_id_now();

        tracing::info!(
            article = %article.id,
            post_id = %post_id,
            "DRY RUN: would publish post"
        );
        Ok(post_id)
    }
}

pub struct SimulatedTracker {
    latency: Duration,
}

impl SimulatedTracker {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl UsageTracker for SimulatedTracker {
    async fn record(&mut self, article: &Article, post_id: &str) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        tracing::info!(
            article = %article.id,
            post_id = %post_id,
            "DRY RUN: would record article as used"
        );
        Ok(())
    }
}

pub struct SimulatedNotifier {
    latency: Duration,
}

impl SimulatedNotifier {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Notifier for SimulatedNotifier {
    async fn notify(&mut self, message: &str) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        tracing::info!(message, "DRY RUN: would send notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::mock::MockContentSource;

    #[test]
    fn test_post_id_format() {
        let id = post_id_now();
        let millis = id.strip_prefix("post_").expect("post_ prefix");
        assert!(millis.parse::<i64>().is_ok());
    }

    #[tokio::test]
    async fn test_publish_returns_post_id() {
        let mut publisher = SimulatedPublisher::new(Duration::ZERO);
        let article = MockContentSource::catalog().remove(0);
        let id = publisher.publish(&article).await.unwrap();
        assert!(id.starts_with("post_"));
    }

    #[tokio::test]
    async fn test_publish_rejects_untitled_article() {
        let mut publisher = SimulatedPublisher::new(Duration::ZERO);
        let mut article = MockContentSource::catalog().remove(0);
        article.title = "  ".to_string();
        let err = publisher.publish(&article).await.unwrap_err();
        assert!(err.to_string().contains("no title"));
    }

    #[tokio::test]
    async fn test_tracker_and_notifier_succeed() {
        let article = MockContentSource::catalog().remove(2);
        SimulatedTracker::new(Duration::ZERO)
            .record(&article, "post_1")
            .await
            .unwrap();
        SimulatedNotifier::new(Duration::ZERO)
            .notify("posted")
            .await
            .unwrap();
    }
}
