pub mod admin_handler;
pub mod auth_handler;
pub mod daily_handler;
pub mod graphql_handler;
pub mod map_handler;
pub mod problem_handler;
pub mod user_handler;

use actix_web::web;

/// Routes that need no token.
pub fn configure_public(cfg: &mut web::ServiceConfig) {
    cfg.service(user_handler::health_check)
        .service(user_handler::health_check_ready)
        .service(user_handler::health_check_live)
        .service(auth_handler::register)
        .service(auth_handler::login)
        .service(graphql_handler::graphql)
        .service(graphql_handler::graphiql);
}

/// Routes mounted under the authenticated `/api` scope. Literal paths are
/// registered before their `{id}` siblings.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(user_handler::me)
        .service(user_handler::my_submissions)
        .service(user_handler::user_submissions)
        .service(user_handler::leaderboard)
        .service(problem_handler::list_problems)
        .service(problem_handler::random_problem)
        .service(problem_handler::practice_problem)
        .service(problem_handler::get_problem)
        .service(problem_handler::check_answer)
        .service(daily_handler::get_daily_challenge)
        .service(daily_handler::check_daily_challenge)
        .service(map_handler::get_map)
        .service(map_handler::next_map_problem)
        .service(map_handler::solve_map_problem)
        .service(map_handler::advance_checkpoint)
        .service(map_handler::restart_journey)
        .service(admin_handler::list_users)
        .service(admin_handler::promote_user)
        .service(admin_handler::demote_user)
        .service(admin_handler::update_user)
        .service(admin_handler::delete_user)
        .service(admin_handler::list_problems)
        .service(admin_handler::generate_problems)
        .service(admin_handler::create_problem)
        .service(admin_handler::update_problem)
        .service(admin_handler::delete_problem);
}
