use std::sync::Arc;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{
    app_state::AppState,
    auth::middleware::bearer_token,
    graphql::Schema,
};

/// Executes a GraphQL request. A valid bearer token, when present, is made
/// available to resolvers as claims; resolvers decide what needs it.
#[post("/graphql")]
pub async fn graphql(
    schema: web::Data<Schema>,
    state: web::Data<Arc<AppState>>,
    http: HttpRequest,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();

    if let Some(token) = bearer_token(http.headers()) {
        match state.jwt.validate_token(token) {
            Ok(claims) => request = request.data(claims),
            Err(e) => log::debug!("Ignoring invalid GraphQL bearer token: {}", e),
        }
    }

    schema.execute(request).await.into()
}

#[get("/graphiql")]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
