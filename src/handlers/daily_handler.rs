use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::AnswerRequest,
    services::today,
};

#[get("/daily-challenge")]
pub async fn get_daily_challenge(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let challenge = state
        .daily_challenge_service
        .todays_challenge(auth.0.user_id(), today())
        .await?
        .ok_or_else(|| AppError::NotFound("No daily challenge is available today".to_string()))?;

    Ok(HttpResponse::Ok().json(challenge))
}

#[post("/daily-challenge/answer")]
pub async fn check_daily_challenge(
    state: web::Data<Arc<AppState>>,
    request: web::Json<AnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let result = state
        .daily_challenge_service
        .check_daily_challenge(&request.answer, auth.0.user_id(), today())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
