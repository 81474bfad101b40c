use std::sync::Arc;

use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_owner_or_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::PageQuery,
};

#[get("/me")]
pub async fn me(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let me = state.user_service.me(auth.0.user_id()).await?;
    Ok(HttpResponse::Ok().json(me))
}

#[get("/me/submissions")]
pub async fn my_submissions(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PageQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let page = state
        .problem_service
        .submission_history(auth.0.user_id(), &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/users/{id}/submissions")]
pub async fn user_submissions(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    query: web::Query<PageQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_owner_or_admin(&auth.0, &id)?;

    let page = state.problem_service.submission_history(&id, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let board = state
        .user_service
        .leaderboard(Some(auth.0.user_id()))
        .await?;
    Ok(HttpResponse::Ok().json(board))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let db_health = match &state.db {
        Some(db) => db.health_check().await.is_ok(),
        None => false,
    };

    let response = serde_json::json!({
        "status": if db_health { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "mongodb": if db_health { "ok" } else { "error" },
            "problem_generator": if state.generator_service.is_enabled() { "configured" } else { "disabled" }
        }
    });

    if db_health {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[get("/health/live")]
pub async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
