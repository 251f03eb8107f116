use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::dto::args::optional_string;
use crate::dto::fleet_dto::{FleetSummaryResponse, GeneralSearchRequest, GeneralSearchResponse, ZipSearchResponse};
use crate::state::AppState;

pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/zip/:zip_code", get(search_by_zip))
        .route("/search", get(search_general))
        .route("/summary/:zip_code", get(get_summary))
}

#[derive(Debug, Default, Deserialize)]
struct StatusQuery {
    #[serde(default, deserialize_with = "optional_string")]
    status: Option<String>,
}

async fn search_by_zip(
    State(state): State<AppState>,
    Path(zip_code): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Json<ZipSearchResponse> {
    Json(state.fleet.search_by_zip(&zip_code, query.status.as_deref()).await)
}

async fn search_general(
    State(state): State<AppState>,
    Query(query): Query<GeneralSearchRequest>,
) -> Json<GeneralSearchResponse> {
    Json(
        state
            .fleet
            .search_general(
                query.make.as_deref(),
                query.model.as_deref(),
                query.category.as_deref(),
                query.status.as_deref(),
            )
            .await,
    )
}

async fn get_summary(State(state): State<AppState>, Path(zip_code): Path<String>) -> Response {
    let summary = state.fleet.get_summary(&zip_code).await;
    let status = match summary {
        FleetSummaryResponse::Summary(_) => StatusCode::OK,
        FleetSummaryResponse::Missing { .. } => StatusCode::NOT_FOUND,
    };
    (status, Json(summary)).into_response()
}
