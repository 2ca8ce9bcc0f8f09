//! Search API routes

use crate::providers::SearchResult;
use crate::search::{PlatformFilter, SortBy};

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use super::error::{ApiError, FieldIssue};
use super::state::{GuardedSearchAggregator, ServerState};

/// Query string as received; every field is validated by hand so that all
/// problems are reported at once.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawSearchParams {
    q: Option<String>,
    sort_by: Option<String>,
    platform: Option<String>,
}

#[derive(Debug, PartialEq)]
struct SearchParams {
    query: String,
    sort_by: SortBy,
    platform: PlatformFilter,
}

/// Absent or empty values fall back to the defaults.
fn parse_or_default<T>(raw: Option<&str>, field: &str, issues: &mut Vec<FieldIssue>) -> T
where
    T: std::str::FromStr<Err = String> + Default,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => T::default(),
        Some(value) => value.parse().unwrap_or_else(|message: String| {
            issues.push(FieldIssue::new(field, message));
            T::default()
        }),
    }
}

impl TryFrom<RawSearchParams> for SearchParams {
    type Error = Vec<FieldIssue>;

    fn try_from(raw: RawSearchParams) -> Result<Self, Self::Error> {
        let mut issues = Vec::new();
        let sort_by = parse_or_default(raw.sort_by.as_deref(), "sortBy", &mut issues);
        let platform = parse_or_default(raw.platform.as_deref(), "platform", &mut issues);

        if !issues.is_empty() {
            return Err(issues);
        }
        Ok(SearchParams {
            query: raw.q.unwrap_or_default(),
            sort_by,
            platform,
        })
    }
}

/// GET /api/search?q=..&sortBy=..&platform=..
async fn search(
    State(aggregator): State<GuardedSearchAggregator>,
    params: Result<Query<RawSearchParams>, QueryRejection>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let Query(raw) = params?;
    let params = SearchParams::try_from(raw).map_err(|details| ApiError::InvalidInput {
        message: "Invalid search parameters".to_string(),
        details,
    })?;
    debug!(?params, "Search request");

    let results = aggregator
        .aggregate(&params.query, params.sort_by, params.platform)
        .await;
    Ok(Json(results))
}

pub fn make_search_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(state)
}
