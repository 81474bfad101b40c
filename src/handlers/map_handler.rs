use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{request::AnswerRequest, response::ProblemDto},
};

#[get("/map")]
pub async fn get_map(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let view = state.progress_service.map_view(auth.0.user_id()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/map/problem")]
pub async fn next_map_problem(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let problem = state.progress_service.next_map_problem(auth.0.user_id()).await?;
    Ok(HttpResponse::Ok().json(ProblemDto::from(problem)))
}

#[post("/map/problems/{id}/answer")]
pub async fn solve_map_problem(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<AnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let result = state
        .progress_service
        .solve_map_problem(&id, &request.answer, auth.0.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/map/advance")]
pub async fn advance_checkpoint(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .progress_service
        .advance_checkpoint(auth.0.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/map/restart")]
pub async fn restart_journey(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state.progress_service.restart_journey(auth.0.user_id()).await?;
    Ok(HttpResponse::Ok().json(progress))
}
