use async_graphql::{Context, Object};
use validator::Validate;

use crate::{
    auth::{extract_claims_from_context, require_admin},
    graphql::helpers::{app_state, resolve},
    models::{
        domain::UserProgress,
        dto::{
            request::{AnswerRequest, GenerateProblemsRequest, LoginRequest, RegisterRequest},
            response::{
                AdvanceResult, AuthResponse, CheckAnswerResult, DailyChallengeResult,
                GenerationReport, MapSolveResult,
            },
        },
    },
    services::today,
};

fn validated_answer(answer: String) -> Result<AnswerRequest, validator::ValidationErrors> {
    let request = AnswerRequest { answer };
    request.validate()?;
    Ok(request)
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn register(&self, ctx: &Context<'_>, input: RegisterRequest) -> async_graphql::Result<AuthResponse> {
        resolve(async {
            let state = app_state(ctx)?;
            state.user_service.register(input).await
        })
        .await
    }

    async fn login(&self, ctx: &Context<'_>, input: LoginRequest) -> async_graphql::Result<AuthResponse> {
        resolve(async {
            let state = app_state(ctx)?;
            state.user_service.login(input).await
        })
        .await
    }

    async fn check_answer(
        &self,
        ctx: &Context<'_>,
        problem_id: String,
        answer: String,
    ) -> async_graphql::Result<CheckAnswerResult> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            let request = validated_answer(answer)?;
            state
                .problem_service
                .check_answer(&problem_id, &request.answer, claims.user_id())
                .await
        })
        .await
    }

    async fn check_daily_challenge(
        &self,
        ctx: &Context<'_>,
        answer: String,
    ) -> async_graphql::Result<DailyChallengeResult> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            let request = validated_answer(answer)?;
            state
                .daily_challenge_service
                .check_daily_challenge(&request.answer, claims.user_id(), today())
                .await
        })
        .await
    }

    async fn solve_map_problem(
        &self,
        ctx: &Context<'_>,
        problem_id: String,
        answer: String,
    ) -> async_graphql::Result<MapSolveResult> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            let request = validated_answer(answer)?;
            state
                .progress_service
                .solve_map_problem(&problem_id, &request.answer, claims.user_id())
                .await
        })
        .await
    }

    async fn advance_checkpoint(&self, ctx: &Context<'_>) -> async_graphql::Result<AdvanceResult> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            state.progress_service.advance_checkpoint(claims.user_id()).await
        })
        .await
    }

    async fn restart_journey(&self, ctx: &Context<'_>) -> async_graphql::Result<UserProgress> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            state.progress_service.restart_journey(claims.user_id()).await
        })
        .await
    }

    async fn generate_problems(
        &self,
        ctx: &Context<'_>,
        input: GenerateProblemsRequest,
    ) -> async_graphql::Result<GenerationReport> {
        resolve(async {
            let state = app_state(ctx)?;
            let claims = extract_claims_from_context(ctx)?;
            require_admin(&claims)?;
            input.validate()?;
            state
                .generator_service
                .generate(input.count, input.difficulty, input.category)
                .await
        })
        .await
    }
}
