use async_graphql::{Context, Object};

use crate::{
    auth::{extract_claims_from_context, require_admin},
    graphql::helpers::{app_state, resolve},
    models::{
        domain::{Category, Difficulty, MapCheckpoint},
        dto::{
            request::PageQuery,
            response::{
                DailyChallengeDto, GeneratedProblemDto, LeaderboardDto, MapView, MeDto, ProblemDto,
                ProblemPage, SubmissionPage, UserPage,
            },
        },
    },
    repositories::ProblemFilter,
    services::today,
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<MeDto> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            state.user_service.me(claims.user_id()).await
        })
        .await
    }

    async fn problems(
        &self,
        ctx: &Context<'_>,
        difficulty: Option<Difficulty>,
        category: Option<Category>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> async_graphql::Result<ProblemPage> {
        resolve(async {
            let state = app_state(ctx)?;
            extract_claims_from_context(ctx)?;

            let filter = ProblemFilter { difficulty, category };
            state
                .problem_service
                .list_problems(filter, &PageQuery { offset, limit })
                .await
        })
        .await
    }

    async fn problem(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<ProblemDto> {
        resolve(async {
            let state = app_state(ctx)?;
            extract_claims_from_context(ctx)?;
            Ok(state.problem_service.get_problem(&id).await?.into())
        })
        .await
    }

    async fn random_problem(
        &self,
        ctx: &Context<'_>,
        difficulty: Option<Difficulty>,
        category: Option<Category>,
    ) -> async_graphql::Result<ProblemDto> {
        resolve(async {
            let state = app_state(ctx)?;
            extract_claims_from_context(ctx)?;

            let filter = ProblemFilter { difficulty, category };
            Ok(state.problem_service.random_problem(filter).await?.into())
        })
        .await
    }

    async fn practice_problem(
        &self,
        ctx: &Context<'_>,
        difficulty: Option<Difficulty>,
    ) -> async_graphql::Result<GeneratedProblemDto> {
        resolve(async {
            let state = app_state(ctx)?;
            Ok(state
                .problem_service
                .practice_problem(difficulty.unwrap_or(Difficulty::Easy)))
        })
        .await
    }

    async fn my_submissions(
        &self,
        ctx: &Context<'_>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> async_graphql::Result<SubmissionPage> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            state
                .problem_service
                .submission_history(claims.user_id(), &PageQuery { offset, limit })
                .await
        })
        .await
    }

    async fn daily_challenge(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<DailyChallengeDto>> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            state
                .daily_challenge_service
                .todays_challenge(claims.user_id(), today())
                .await
        })
        .await
    }

    async fn map(&self, ctx: &Context<'_>) -> async_graphql::Result<MapView> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            state.progress_service.map_view(claims.user_id()).await
        })
        .await
    }

    async fn next_map_problem(&self, ctx: &Context<'_>) -> async_graphql::Result<ProblemDto> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            Ok(state
                .progress_service
                .next_map_problem(claims.user_id())
                .await?
                .into())
        })
        .await
    }

    async fn checkpoints(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<MapCheckpoint>> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            let view = state.progress_service.map_view(claims.user_id()).await?;
            Ok(view.checkpoints.into_iter().map(|c| c.checkpoint).collect())
        })
        .await
    }

    async fn leaderboard(&self, ctx: &Context<'_>) -> async_graphql::Result<LeaderboardDto> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx).ok();
            state
                .user_service
                .leaderboard(claims.as_ref().map(|c| c.user_id()))
                .await
        })
        .await
    }

    async fn users(
        &self,
        ctx: &Context<'_>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> async_graphql::Result<UserPage> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            require_admin(&claims)?;
            state.user_service.list_users(&PageQuery { offset, limit }).await
        })
        .await
    }
}
