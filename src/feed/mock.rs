//! Static article catalog standing in for a Medium fetch.

use super::types::Article;
use super::ContentSource;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct MockContentSource {
    latency: Duration,
}

impl MockContentSource {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// The fixed three-article catalog every fetch returns.
    pub fn catalog() -> Vec<Article> {
        vec![
            article(
                "article1",
                "Building Modern React Applications",
                "A comprehensive guide to React best practices",
                "John Doe",
                "2024-01-15T10:00:00Z",
                8,
                "https://medium.com/@johndoe/react-guide",
            ),
            article(
                "article2",
                "TypeScript for Beginners",
                "Getting started with TypeScript in 2024",
                "Jane Smith",
                "2024-01-14T15:30:00Z",
                12,
                "https://medium.com/@janesmith/typescript-guide",
            ),
            article(
                "article3",
                "Advanced JavaScript Patterns",
                "Mastering modern JavaScript development",
                "Mike Johnson",
                "2024-01-13T09:15:00Z",
                15,
                "https://medium.com/@mikejohnson/js-patterns",
            ),
        ]
    }
}

fn article(
    id: &str,
    title: &str,
    subtitle: &str,
    author: &str,
    published_at: &str,
    read_time: u32,
    url: &str,
) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        author: author.to_string(),
        published_at: published_at.to_string(),
        read_time,
        url: url.to_string(),
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn fetch(&mut self, tag: &str) -> Result<Vec<Article>> {
        tracing::debug!(tag, latency_ms = self.latency.as_millis() as u64, "mock fetch");
        tokio::time::sleep(self.latency).await;
        Ok(Self::catalog())
    }

    fn name(&self) -> &str {
        "medium-mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let catalog = MockContentSource::catalog();
        let ids: HashSet<&str> = catalog.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_catalog_dates_parse() {
        for a in MockContentSource::catalog() {
            assert!(
                chrono::DateTime::parse_from_rfc3339(&a.published_at).is_ok(),
                "bad date on {}",
                a.id
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_ignores_tag() {
        let mut source = MockContentSource::new(Duration::ZERO);
        let rust = source.fetch("rust").await.unwrap();
        let css = source.fetch("css").await.unwrap();
        assert_eq!(rust.len(), 3);
        assert_eq!(rust, css);
        assert_eq!(rust[1].title, "TypeScript for Beginners");
    }
}
