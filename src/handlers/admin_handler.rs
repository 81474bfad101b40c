use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::{
        domain::UserRole,
        dto::{
            request::{GenerateProblemsRequest, PageQuery, ProblemQuery, ProblemRequest, UpdateUserRequest},
            response::{AdminProblemDto, MessageResponse},
        },
    },
    repositories::ProblemFilter,
};

#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PageQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let page = state.user_service.list_users(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/admin/users/{id}/promote")]
pub async fn promote_user(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let user = state
        .user_service
        .set_role(auth.0.user_id(), &id, UserRole::Admin)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/admin/users/{id}/demote")]
pub async fn demote_user(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let user = state
        .user_service
        .set_role(auth.0.user_id(), &id, UserRole::User)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/admin/users/{id}")]
pub async fn update_user(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let user = state
        .user_service
        .update_user(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.user_service.delete_user(auth.0.user_id(), &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted")))
}

#[get("/admin/problems")]
pub async fn list_problems(
    state: web::Data<Arc<AppState>>,
    query: web::Query<ProblemQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let filter = ProblemFilter {
        difficulty: query.difficulty,
        category: query.category,
    };
    let (items, total) = state
        .problem_service
        .admin_list_problems(filter, &query.page())
        .await?;
    let items: Vec<AdminProblemDto> = items.into_iter().map(AdminProblemDto::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "items": items, "total": total })))
}

#[post("/admin/problems")]
pub async fn create_problem(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ProblemRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let problem = state.problem_service.create_problem(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(AdminProblemDto::from(problem)))
}

#[put("/admin/problems/{id}")]
pub async fn update_problem(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<ProblemRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let problem = state
        .problem_service
        .update_problem(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(AdminProblemDto::from(problem)))
}

#[delete("/admin/problems/{id}")]
pub async fn delete_problem(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.problem_service.delete_problem(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Problem deleted")))
}

#[post("/admin/problems/generate")]
pub async fn generate_problems(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateProblemsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let report = state
        .generator_service
        .generate(request.count, request.difficulty, request.category)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}
