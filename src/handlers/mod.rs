//! HTTP handlers for the cart recommendation service.
//!
//! This layer owns everything the engine deliberately does not: JSON
//! (de)serialization, wall-clock access for the default hour signal, and
//! the demo page. The engine only ever sees raw signals.

use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Recommendation;
use crate::services::RecommendationEngine;

/// Segment applied when the client does not send one. Mirrors the quick
/// demo default used by the original frontend.
pub const DEFAULT_USER_SEGMENT: &str = "Premium";

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub struct RecommendationHandlerState {
    pub engine: Arc<RecommendationEngine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub cart_items: Vec<String>,
    #[serde(default)]
    pub user_segment: Option<String>,
    #[serde(default)]
    pub hour: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferredContext {
    pub time_of_day: String,
    pub user_segment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub cart: Vec<String>,
    pub inferred_context: InferredContext,
    pub recommendations: Vec<Recommendation>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub model_version: String,
    pub item_count: usize,
    pub top_k: usize,
    pub max_candidates: usize,
}

/// Minimal demo frontend.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[post("/api/recommend")]
pub async fn get_recommendations(
    state: web::Data<RecommendationHandlerState>,
    payload: web::Json<RecommendationRequest>,
) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4();
    let request = payload.into_inner();

    let user_segment = request
        .user_segment
        .as_deref()
        .unwrap_or(DEFAULT_USER_SEGMENT);
    // Wall-clock access stays out here; the engine only sees the raw hour.
    let hour = request
        .hour
        .unwrap_or_else(|| chrono::Local::now().hour());

    info!(
        request_id = %request_id,
        cart_len = request.cart_items.len(),
        user_segment = user_segment,
        hour = hour,
        "recommendation request"
    );

    let context = state.engine.resolve_context(hour, user_segment);
    let recommendations = state
        .engine
        .recommend(&request.cart_items, user_segment, hour);

    info!(
        request_id = %request_id,
        result_len = recommendations.len(),
        "recommendation request served"
    );

    Ok(HttpResponse::Ok().json(RecommendationResponse {
        cart: request.cart_items,
        inferred_context: InferredContext {
            time_of_day: context.time_of_day.as_str().to_string(),
            user_segment: context.user_segment.as_str().to_string(),
        },
        recommendations,
        status: "success".to_string(),
    }))
}

#[get("/api/model")]
pub async fn get_model_info(
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ModelInfoResponse {
        model_version: state.engine.model_version().to_string(),
        item_count: state.engine.item_count(),
        top_k: state.engine.top_k(),
        max_candidates: state.engine.max_candidates(),
    }))
}
