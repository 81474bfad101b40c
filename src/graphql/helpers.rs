use std::future::Future;

use async_graphql::{Context, ErrorExtensions};

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub fn app_state<'a>(ctx: &Context<'a>) -> AppResult<&'a AppState> {
    ctx.data::<AppState>()
        .map_err(|_| AppError::InternalError("Application state is not configured".to_string()))
}

/// Runs a resolver body, turning [`AppError`] into a GraphQL error with a
/// `code` extension and a client-safe message.
pub async fn resolve<T>(body: impl Future<Output = AppResult<T>>) -> async_graphql::Result<T> {
    body.await.map_err(|e| e.extend())
}
