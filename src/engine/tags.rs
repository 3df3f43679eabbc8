//! Uniform random choice of the topic tag a run is about.

use anyhow::Result;
use rand::Rng;

/// Dev-community topic tags used when the config does not override them.
pub const DEFAULT_TAGS: &[&str] = &[
    "reactnative", "flutter", "webdev", "frontend", "backend", "javascript",
    "typescript", "html", "css", "react", "vue", "nextjs", "node", "nodejs",
    "express", "django", "ai", "artificial-intelligence", "machinelearning",
    "deeplearning", "datascience", "python", "data-analytics", "chatgpt",
    "nlp", "neuralnetworks", "cloudcomputing", "softwareengineering",
    "softwareengineer", "softwaredeveloper", "programming", "coding",
    "developer", "devops", "computerscience", "fullstack", "programmer",
    "coder", "csharp", "cpp", "java", "sql", "database", "git", "google",
    "microsoft", "aws", "azure", "kubernetes", "docker", "cloud",
    "serverless", "startup", "startups", "entrepreneurship", "business",
    "innovation", "leadership", "marketing", "productivity", "networking",
    "ecommerce", "tech", "technology", "open-source", "devcommunity",
];

#[derive(Debug, Clone)]
pub struct TagSelector {
    catalog: Vec<String>,
}

impl TagSelector {
    pub fn new(catalog: Vec<String>) -> Result<Self> {
        if catalog.is_empty() {
            anyhow::bail!("tag catalog must contain at least one tag");
        }
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Each tag has probability 1/N.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // `new` guarantees a non-empty catalog.
        &self.catalog[rng.gen_range(0..self.catalog.len())]
    }
}

impl Default for TagSelector {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_default_catalog() {
        let selector = TagSelector::default();
        assert_eq!(selector.catalog().len(), 66);
        assert_eq!(selector.catalog()[0], "reactnative");
        assert_eq!(selector.catalog()[65], "devcommunity");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(TagSelector::new(Vec::new()).is_err());
    }

    #[test]
    fn test_single_tag_always_picked() {
        let selector = TagSelector::new(vec!["rust".to_string()]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(selector.pick(&mut rng), "rust");
        }
    }

    #[test]
    fn test_distribution_is_roughly_uniform() {
        let selector = TagSelector::default();
        let n = selector.catalog().len();
        let draws_per_tag = 1000;
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..n * draws_per_tag {
            *counts.entry(selector.pick(&mut rng)).or_default() += 1;
        }

        // Every tag drawn, none dominant (expected 1000, sd ~32).
        assert_eq!(counts.len(), n);
        for (tag, count) in counts {
            assert!(
                (700..=1300).contains(&count),
                "tag {} drawn {} times",
                tag,
                count
            );
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let selector = TagSelector::default();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let seq_a: Vec<String> = (0..10).map(|_| selector.pick(&mut a).to_string()).collect();
        let seq_b: Vec<String> = (0..10).map(|_| selector.pick(&mut b).to_string()).collect();
        assert_eq!(seq_a, seq_b);
    }
}
