//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::types::{CatalogResponse, ErrorResponse, RecommendRequest};
use crate::config::Assumptions;

/// Runs the engine for the posted answers.
///
/// `POST /recommend` → 200 + `RecommendationResponse` JSON
/// `POST /recommend` with a missing mandatory answer → 422 + the negative
/// response carrying `error`
/// `POST /recommend` with a malformed body → 400 + `ErrorResponse`
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(req) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    let products = &state.catalog.products;
    let response = match req.irradiance {
        Some(ref data) => state
            .engine
            .recommend_answers(&req.answers, products, Some(data)),
        None => state
            .engine
            .recommend_with_provider(&req.answers, products, state.irradiance.as_ref()),
    };

    let status = if response.error.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    (status, Json(response)).into_response()
}

/// Returns the loaded catalog.
///
/// `GET /catalog` → 200 + `CatalogResponse` JSON
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        source: state.catalog.source,
        products: state.catalog.products.clone(),
    })
}

/// Returns the active assumption set.
///
/// `GET /assumptions` → 200 + `Assumptions` JSON
pub async fn get_assumptions(State(state): State<Arc<AppState>>) -> Json<Assumptions> {
    Json(state.engine.assumptions().clone())
}
