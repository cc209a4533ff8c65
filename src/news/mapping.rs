use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NewsError;

pub const UNTITLED_ARTICLE: &str = "Untitled article";
pub const UNKNOWN_SOURCE: &str = "Unknown source";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400?text=Health+News";
pub const MISSING_ARTICLE_URL: &str = "#";
const REMOVED_MARKER: &str = "[Removed]";

pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Business,
    Entertainment,
    General,
    #[default]
    Health,
    Science,
    Sports,
    Technology,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::General => "general",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }
}

impl FromStr for NewsCategory {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "business" => Ok(Self::Business),
            "entertainment" => Ok(Self::Entertainment),
            "general" => Ok(Self::General),
            "health" => Ok(Self::Health),
            "science" => Ok(Self::Science),
            "sports" => Ok(Self::Sports),
            "technology" => Ok(Self::Technology),
            other => Err(NewsError::InvalidRequest(format!(
                "Unknown news category: {other}"
            ))),
        }
    }
}

/// Validated top-headlines query.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsQuery {
    pub category: NewsCategory,
    /// Lowercase ISO 3166-1 alpha-2 code.
    pub country: String,
    pub page_size: u32,
}

impl NewsQuery {
    pub fn new(category: &str, country: &str, page_size: u32) -> Result<Self, NewsError> {
        let category = category.parse()?;
        let country = country.trim().to_lowercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(NewsError::InvalidRequest(format!(
                "Country must be a two-letter code, got '{country}'"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(NewsError::InvalidRequest(format!(
                "Page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self {
            category,
            country,
            page_size,
        })
    }
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            category: NewsCategory::Health,
            country: DEFAULT_COUNTRY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Article exactly as the upstream feed sends it. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub image_url: String,
    pub source_name: String,
    /// `None` when the feed omitted the date or sent an unparseable one.
    pub published_at: Option<DateTime<Utc>>,
    pub article_url: String,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Map raw feed items defensively. Ids are unique across the returned batch.
pub fn map_articles(raw: &[RawArticle], request_millis: i64) -> Vec<NewsArticle> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut articles = Vec::with_capacity(raw.len());

    for (index, item) in raw.iter().enumerate() {
        let title = non_blank(item.title.as_deref());
        if title.as_deref() == Some(REMOVED_MARKER) {
            continue;
        }

        let url = non_blank(item.url.as_deref());
        let base_id = url
            .clone()
            .unwrap_or_else(|| format!("news-{index}-{request_millis}"));
        let mut id = base_id.clone();
        let mut suffix = 1;
        while !seen.insert(id.clone()) {
            id = format!("{base_id}-{suffix}");
            suffix += 1;
        }

        articles.push(NewsArticle {
            id,
            title: title.unwrap_or_else(|| UNTITLED_ARTICLE.to_string()),
            snippet: non_blank(item.description.as_deref()),
            image_url: non_blank(item.url_to_image.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            source_name: non_blank(item.source.as_ref().and_then(|s| s.name.as_deref()))
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            published_at: item
                .published_at
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d.trim()).ok())
                .map(|d| d.with_timezone(&Utc)),
            article_url: url.unwrap_or_else(|| MISSING_ARTICLE_URL.to_string()),
        });
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: Option<&str>, url: Option<&str>) -> RawArticle {
        RawArticle {
            title: title.map(Into::into),
            url: url.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn complete_article_maps_through() {
        let item = RawArticle {
            source: Some(RawSource {
                id: None,
                name: Some("Health Daily".into()),
            }),
            title: Some("New flu season guidance".into()),
            description: Some("What to know this winter.".into()),
            url: Some("https://example.com/flu".into()),
            url_to_image: Some("https://example.com/flu.jpg".into()),
            published_at: Some("2024-11-02T08:30:00Z".into()),
        };
        let articles = map_articles(&[item], 1_700_000_000_000);
        let article = &articles[0];
        assert_eq!(article.id, "https://example.com/flu");
        assert_eq!(article.article_url, "https://example.com/flu");
        assert_eq!(article.source_name, "Health Daily");
        assert_eq!(article.snippet.as_deref(), Some("What to know this winter."));
        assert_eq!(
            article.published_at.map(|d| d.to_rfc3339()),
            Some("2024-11-02T08:30:00+00:00".to_string())
        );
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let articles = map_articles(&[raw(None, None)], 42);
        let article = &articles[0];
        assert_eq!(article.title, UNTITLED_ARTICLE);
        assert_eq!(article.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(article.source_name, UNKNOWN_SOURCE);
        assert_eq!(article.article_url, "#");
        assert!(article.snippet.is_none());
        assert!(article.published_at.is_none());
    }

    #[test]
    fn fallback_ids_are_non_empty_and_unique() {
        let items = vec![
            raw(Some("a"), None),
            raw(Some("b"), Some("   ")),
            raw(Some("c"), None),
            raw(Some("d"), Some("https://example.com/x")),
            raw(Some("e"), Some("https://example.com/x")),
        ];
        let articles = map_articles(&items, 1_700_000_000_123);
        assert_eq!(articles.len(), 5);
        assert_eq!(articles[0].id, "news-0-1700000000123");

        let ids: HashSet<&str> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
        assert!(articles.iter().all(|a| !a.id.is_empty()));
        assert_eq!(articles[4].id, "https://example.com/x-1");
    }

    #[test]
    fn removed_items_are_skipped() {
        let items = vec![
            raw(Some("[Removed]"), Some("https://removed.com")),
            raw(Some("Kept"), None),
        ];
        let articles = map_articles(&items, 0);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
        assert_eq!(articles[0].id, "news-1-0");
    }

    #[test]
    fn query_validation() {
        let query = NewsQuery::new("Health", "IN", 10).unwrap();
        assert_eq!(query.category, NewsCategory::Health);
        assert_eq!(query.country, "in");

        assert!(NewsQuery::new("gossip", "us", 10).is_err());
        assert!(NewsQuery::new("health", "usa", 10).is_err());
        assert!(NewsQuery::new("health", "u1", 10).is_err());
        assert!(NewsQuery::new("health", "us", 0).is_err());
        assert!(NewsQuery::new("health", "us", 101).is_err());
    }

    #[test]
    fn article_serializes_camel_case() {
        let articles = map_articles(&[raw(Some("t"), None)], 5);
        let json = serde_json::to_value(&articles[0]).unwrap();
        assert_eq!(json["imageUrl"], PLACEHOLDER_IMAGE_URL);
        assert_eq!(json["articleUrl"], "#");
        assert!(json.get("snippet").is_none());
    }
}
