use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::{
        domain::Difficulty,
        dto::{
            request::{AnswerRequest, DifficultyQuery, ProblemQuery},
            response::ProblemDto,
        },
    },
    repositories::ProblemFilter,
};

#[get("/problems")]
pub async fn list_problems(
    state: web::Data<Arc<AppState>>,
    query: web::Query<ProblemQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let filter = ProblemFilter {
        difficulty: query.difficulty,
        category: query.category,
    };

    let page = state.problem_service.list_problems(filter, &query.page()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/problems/random")]
pub async fn random_problem(
    state: web::Data<Arc<AppState>>,
    query: web::Query<DifficultyQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let filter = ProblemFilter {
        difficulty: query.difficulty,
        category: query.category,
    };

    let problem = state.problem_service.random_problem(filter).await?;
    Ok(HttpResponse::Ok().json(ProblemDto::from(problem)))
}

#[get("/problems/practice")]
pub async fn practice_problem(
    state: web::Data<Arc<AppState>>,
    query: web::Query<DifficultyQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let difficulty = query.difficulty.unwrap_or(Difficulty::Easy);
    Ok(HttpResponse::Ok().json(state.problem_service.practice_problem(difficulty)))
}

#[get("/problems/{id}")]
pub async fn get_problem(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let problem = state.problem_service.get_problem(&id).await?;
    Ok(HttpResponse::Ok().json(ProblemDto::from(problem)))
}

#[post("/problems/{id}/answer")]
pub async fn check_answer(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<AnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let result = state
        .problem_service
        .check_answer(&id, &request.answer, auth.0.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
