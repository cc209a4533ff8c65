use serde::Deserialize;

use super::mapping::{map_articles, NewsArticle, NewsQuery, RawArticle};
use super::NewsError;

/// Upstream headline feed (allows mocking).
pub trait NewsSource {
    fn top_headlines(&self, query: &NewsQuery) -> Result<Vec<RawArticle>, NewsError>;
}

/// Validate, fetch once, and map. No retries.
pub fn fetch_news(
    source: &dyn NewsSource,
    category: &str,
    country: &str,
    page_size: u32,
) -> Result<Vec<NewsArticle>, NewsError> {
    let query = NewsQuery::new(category, country, page_size)?;
    let request_millis = chrono::Utc::now().timestamp_millis();

    let raw = source.top_headlines(&query)?;
    let articles = map_articles(&raw, request_millis);

    tracing::info!(
        category = query.category.as_str(),
        country = %query.country,
        received = raw.len(),
        mapped = articles.len(),
        "News fetched"
    );
    Ok(articles)
}

/// HTTP client for `GET {base}/top-headlines`.
pub struct NewsApiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl NewsApiClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, NewsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| NewsError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout_secs,
        })
    }
}

/// Envelope shared by success and error bodies.
#[derive(Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<serde_json::Value>,
}

/// Interpret a `top-headlines` response body.
fn parse_headlines(http_status: u16, body: &str) -> Result<Vec<RawArticle>, NewsError> {
    let parsed: Result<NewsApiResponse, _> = serde_json::from_str(body);
    let success = (200..300).contains(&http_status);

    match parsed {
        Ok(response) if success && response.status.as_deref() != Some("error") => {
            // Parse leniently: skip items that fail to deserialize.
            Ok(response
                .articles
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect())
        }
        Ok(response) => Err(NewsError::Upstream {
            status: http_status,
            message: response
                .message
                .or(response.code)
                .unwrap_or_else(|| "News service reported an error".into()),
        }),
        Err(_) if !success => Err(NewsError::Upstream {
            status: http_status,
            message: body.chars().take(200).collect(),
        }),
        Err(e) => Err(NewsError::MalformedResponse(e.to_string())),
    }
}

impl NewsSource for NewsApiClient {
    fn top_headlines(&self, query: &NewsQuery) -> Result<Vec<RawArticle>, NewsError> {
        let api_key = self.api_key.as_deref().ok_or(NewsError::MissingApiKey)?;

        let url = format!("{}/top-headlines", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("category", query.category.as_str().to_string()),
                ("country", query.country.clone()),
                ("pageSize", query.page_size.to_string()),
                ("apiKey", api_key.to_string()),
                ("language", "en".to_string()),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    NewsError::Http(format!("Request timed out after {}s", self.timeout_secs))
                } else {
                    NewsError::Http(e.without_url().to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| NewsError::Http(e.without_url().to_string()))?;

        parse_headlines(status, &body).map_err(|e| {
            tracing::warn!(status, "News API request failed");
            e
        })
    }
}
