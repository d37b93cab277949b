use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::router::AppState;
use crate::rsvp::guests;

/// Autocomplete contract: case-insensitive substring match over
/// unconfirmed guests, at least two characters of query, at most twenty
/// names back. Shorter queries get an empty list rather than the whole
/// registry.
const MIN_QUERY_LEN: usize = 2;
const AUTOCOMPLETE_LIMIT: usize = 20;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn unconfirmed_guests(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let q = query.q.unwrap_or_default();
    let q = q.trim();

    let items = if q.chars().count() < MIN_QUERY_LEN {
        Vec::new()
    } else {
        guests::search_unconfirmed(&state.db, q, AUTOCOMPLETE_LIMIT).await?
    };

    Ok(Json(json!({ "ok": true, "items": items })))
}
