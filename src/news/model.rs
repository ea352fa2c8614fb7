use time::OffsetDateTime;

/// A provider-agnostic news article, already normalized and filtered.
/// `url` doubles as the display key; every field the completeness filter
/// requires is non-empty and non-sentinel here.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub source: Option<String>,
    pub published_at: Option<OffsetDateTime>,
}
