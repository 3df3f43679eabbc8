/// A candidate article for a post. Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published_at: String, // RFC 3339
    pub read_time: u32,       // minutes
    pub url: String,
}
