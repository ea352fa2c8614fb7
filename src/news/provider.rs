use super::model::Article;
use anyhow::{Result, anyhow};
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

/// Placeholder some providers return in place of withdrawn content.
const SENTINEL_REMOVED: &str = "[Removed]";

/// Which remote news API we are talking to. Each variant knows its own
/// endpoint, query parameter names, and raw record shape; everything past
/// this module only sees the canonical `Article`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GNews,
    NewsApi,
}

impl Provider {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gnews" => Ok(Provider::GNews),
            "newsapi" => Ok(Provider::NewsApi),
            other => Err(anyhow!(
                "unknown provider '{}' (expected 'gnews' or 'newsapi')",
                other
            )),
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            Provider::GNews => "https://gnews.io/api/v4/search",
            Provider::NewsApi => "https://newsapi.org/v2/everything",
        }
    }

    pub fn default_query(self) -> &'static str {
        match self {
            Provider::GNews => "soccer",
            Provider::NewsApi => "latest soccer",
        }
    }

    /// Build the search URL for `query` against `endpoint`.
    pub fn search_url(
        self,
        endpoint: &str,
        query: &str,
        api_key: &str,
        language: &str,
        result_limit: u32,
    ) -> Result<Url> {
        let mut url =
            Url::parse(endpoint).map_err(|e| anyhow!("invalid endpoint '{}': {}", endpoint, e))?;
        {
            let mut pairs = url.query_pairs_mut();
            match self {
                Provider::GNews => {
                    pairs
                        .append_pair("q", query)
                        .append_pair("token", api_key)
                        .append_pair("lang", language)
                        .append_pair("max", &result_limit.to_string());
                }
                Provider::NewsApi => {
                    pairs
                        .append_pair("q", query)
                        .append_pair("apiKey", api_key)
                        .append_pair("language", language)
                        .append_pair("pageSize", &result_limit.to_string());
                }
            }
        }
        Ok(url)
    }

    /// Decode a response body into filtered canonical articles, preserving
    /// provider order. Any shape mismatch is a plain error; callers treat it
    /// the same as a network failure.
    pub fn parse_articles(self, body: &[u8]) -> Result<Vec<Article>> {
        let raw: Vec<RawArticle> = match self {
            Provider::GNews => {
                let env: GNewsEnvelope = serde_json::from_slice(body)?;
                env.articles
            }
            Provider::NewsApi => {
                let env: NewsApiEnvelope = serde_json::from_slice(body)?;
                env.articles
            }
        };
        Ok(raw.into_iter().filter_map(|r| r.normalize(self)).collect())
    }
}

#[derive(Debug, Deserialize)]
struct GNewsEnvelope {
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiEnvelope {
    articles: Vec<RawArticle>,
}

/// Union of the two providers' record shapes; `image` vs `urlToImage` is the
/// only structural difference that matters.
#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    source: Option<RawSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Named { name: Option<String> },
    Plain(String),
}

impl RawArticle {
    /// Map a raw record to a canonical Article, or drop it when any required
    /// display field is missing, blank, or the "[Removed]" sentinel.
    fn normalize(self, provider: Provider) -> Option<Article> {
        let title = required(self.title)?;
        let description = required(self.description)?;
        let url = required(self.url)?;
        let image = match provider {
            Provider::GNews => required(self.image)?,
            Provider::NewsApi => required(self.url_to_image)?,
        };
        let source = self.source.and_then(|s| match s {
            RawSource::Named { name } => name,
            RawSource::Plain(name) => Some(name),
        });
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok());
        Some(Article {
            title,
            description,
            url,
            image,
            source: source.filter(|s| !s.trim().is_empty()),
            published_at,
        })
    }
}

fn required(field: Option<String>) -> Option<String> {
    let value = field?;
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == SENTINEL_REMOVED {
        return None;
    }
    Some(value)
}

/// Re-apply the completeness filter to canonical articles. Idempotent:
/// anything that came out of `parse_articles` passes unchanged.
pub fn filter_displayable(articles: Vec<Article>) -> Vec<Article> {
    articles.into_iter().filter(is_displayable).collect()
}

fn is_displayable(a: &Article) -> bool {
    [&a.title, &a.description, &a.url, &a.image]
        .iter()
        .all(|f| !f.trim().is_empty() && f.trim() != SENTINEL_REMOVED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: &str) -> Article {
        Article {
            title: title.into(),
            description: description.into(),
            url: "https://example.com/a".into(),
            image: "https://example.com/a.jpg".into(),
            source: None,
            published_at: None,
        }
    }

    #[test]
    fn gnews_drops_record_missing_description() {
        let body = br#"{"totalArticles":3,"articles":[
            {"title":"First","description":"d1","url":"https://e.com/1","image":"https://e.com/1.jpg"},
            {"title":"Second","url":"https://e.com/2","image":"https://e.com/2.jpg"},
            {"title":"Third","description":"d3","url":"https://e.com/3","image":"https://e.com/3.jpg"}
        ]}"#;
        let got = Provider::GNews.parse_articles(body).unwrap();
        let titles: Vec<&str> = got.iter().map(|a| a.title.as_str()).collect();
        // Original relative order survives the filter
        assert_eq!(titles, ["First", "Third"]);
    }

    #[test]
    fn newsapi_uses_url_to_image_and_rejects_sentinel() {
        let body = br#"{"status":"ok","articles":[
            {"title":"[Removed]","description":"[Removed]","url":"https://removed.com","urlToImage":"https://e.com/x.jpg"},
            {"title":"Kept","description":"fine","url":"https://e.com/k","urlToImage":"https://e.com/k.jpg",
             "source":{"id":null,"name":"Example"},"publishedAt":"2024-03-01T12:00:00Z"}
        ]}"#;
        let got = Provider::NewsApi.parse_articles(body).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Kept");
        assert_eq!(got[0].image, "https://e.com/k.jpg");
        assert_eq!(got[0].source.as_deref(), Some("Example"));
        assert!(got[0].published_at.is_some());
    }

    #[test]
    fn gnews_record_without_image_is_dropped() {
        let body = br#"{"articles":[
            {"title":"NoImage","description":"d","url":"https://e.com/n"}
        ]}"#;
        let got = Provider::GNews.parse_articles(body).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn malformed_envelope_is_an_error() {
        assert!(Provider::GNews.parse_articles(b"{\"items\":[]}").is_err());
        assert!(Provider::NewsApi.parse_articles(b"not json").is_err());
    }

    #[test]
    fn filter_displayable_is_idempotent() {
        let input = vec![
            article("ok", "fine"),
            article("", "missing title"),
            article("[Removed]", "sentinel"),
            article("also ok", "  also fine  "),
        ];
        let once = filter_displayable(input);
        let twice = filter_displayable(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn search_url_carries_provider_specific_params() {
        let url = Provider::GNews
            .search_url("https://gnews.io/api/v4/search", "rust lang", "k3y", "en", 10)
            .unwrap();
        let q: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(q.contains(&("q".into(), "rust lang".into())));
        assert!(q.contains(&("token".into(), "k3y".into())));
        assert!(q.contains(&("lang".into(), "en".into())));
        assert!(q.contains(&("max".into(), "10".into())));

        let url = Provider::NewsApi
            .search_url("https://newsapi.org/v2/everything", "rust", "k3y", "en", 25)
            .unwrap();
        let q: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(q.contains(&("apiKey".into(), "k3y".into())));
        assert!(q.contains(&("pageSize".into(), "25".into())));
    }
}
