use serde::{Deserialize, Serialize};

use crate::model::SearchSession;
use crate::recipe::SearchResultSummary;

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Deserialize)]
pub struct ServingsRequest {
    pub servings: f64,
}

/// One rendered page of search results plus what pagination controls need.
#[derive(Serialize)]
pub struct SearchPageResponse {
    pub query: String,
    pub page: usize,
    pub page_count: usize,
    pub results: Vec<SearchResultSummary>,
}

impl SearchPageResponse {
    pub fn new(session: &SearchSession, results: Vec<SearchResultSummary>) -> Self {
        Self {
            query: session.query.clone(),
            page: session.page,
            page_count: session.page_count(),
            results,
        }
    }
}

#[derive(Serialize)]
pub struct BookmarkToggleResponse {
    pub id: String,
    pub bookmarked: bool,
}
