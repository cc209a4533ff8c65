//! Health headlines from the news API, mapped into display-safe articles.

pub mod client;
pub mod mapping;

pub use client::{fetch_news, NewsApiClient, NewsSource};
pub use mapping::{map_articles, NewsArticle, NewsCategory, NewsQuery, RawArticle};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NewsError {
    #[error("Invalid news request: {0}")]
    InvalidRequest(String),

    #[error("News API key is not configured")]
    MissingApiKey,

    #[error("News service request failed: {0}")]
    Http(String),

    #[error("News service returned error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed news response: {0}")]
    MalformedResponse(String),
}
