//! `GET /api/news?category&country&pageSize`: health headlines.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::api::endpoints::run_blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, NewsParams};
use crate::news::mapping::{DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE};
use crate::news::{fetch_news, NewsArticle, NewsCategory};

pub async fn list(
    State(ctx): State<ApiContext>,
    params: Result<Query<NewsParams>, QueryRejection>,
) -> Result<Json<Vec<NewsArticle>>, ApiError> {
    let Query(params) = params?;
    let category = params
        .category
        .unwrap_or_else(|| NewsCategory::default().as_str().to_string());
    let country = params
        .country
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let source = ctx.news.clone();
    run_blocking(move || fetch_news(source.as_ref(), &category, &country, page_size))
        .await
        .map(Json)
}
