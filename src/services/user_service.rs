use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::{User, UserProfile, UserRole},
        dto::{
            request::{LoginRequest, PageQuery, RegisterRequest, UpdateUserRequest},
            response::{AuthResponse, LeaderboardDto, LeaderboardEntry, MeDto, UserDto, UserPage},
        },
    },
    repositories::{ProfileRepository, SubmissionRepository, UserRepository},
    services::progress_service::ProgressService,
};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    progress_service: Arc<ProgressService>,
    jwt: JwtService,
    leaderboard_size: i64,
}

/// Competition ranking over users already sorted by points, highest first:
/// equal points share a rank and the next rank skips accordingly.
pub fn rank_entries(users: Vec<User>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(users.len());

    for (index, user) in users.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(previous) if previous.points == user.profile.points => previous.rank,
            _ => index as i64 + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            username: user.username,
            avatar: user.profile.avatar,
            points: user.profile.points,
            current_streak: user.profile.current_streak,
        });
    }

    entries
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn ProfileRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        progress_service: Arc<ProgressService>,
        jwt: JwtService,
        leaderboard_size: i64,
    ) -> Self {
        Self {
            users,
            profiles,
            submissions,
            progress_service,
            jwt,
            leaderboard_size,
        }
    }

    fn auth_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.jwt.create_token(&user)?;
        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in_hours: self.jwt.expiration_hours(),
            user: user.into(),
        })
    }

    async fn ensure_unique(&self, username: &str, email: &str, except_id: Option<&str>) -> AppResult<()> {
        let other = |user: &User| except_id != Some(user.id.as_str());

        if self.users.find_by_username(username).await?.filter(other).is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        if self.users.find_by_email(email).await?.filter(other).is_some() {
            return Err(AppError::AlreadyExists(
                "An account with this email already exists".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let username = request.username.trim();
        let email = request.email.trim().to_lowercase();
        self.ensure_unique(username, &email, None).await?;

        let password_hash = hash_password(&request.password)?;
        let progress = self.progress_service.initial_progress().await?;
        let user = User::new(
            username,
            &email,
            &password_hash,
            UserProfile::default(),
            progress,
        );

        let user = self.users.create(user).await?;
        log::info!("Registered user {} ({})", user.username, user.id);
        self.auth_response(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());
        let user = self
            .users
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash) {
            log::info!("Failed login for user {}", user.username);
            return Err(invalid());
        }

        self.auth_response(user)
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }

    pub async fn me(&self, user_id: &str) -> AppResult<MeDto> {
        let user = self.get_user(user_id).await?;
        let rank = self.profiles.rank_of(user.profile.points).await?;
        let stats = self.submissions.stats_for_user(user_id).await?;

        Ok(MeDto {
            progress: user.progress.clone(),
            user: user.into(),
            rank,
            total_submissions: stats.total,
            correct_submissions: stats.correct,
        })
    }

    pub async fn leaderboard(&self, user_id: Option<&str>) -> AppResult<LeaderboardDto> {
        let users = self.profiles.leaderboard(self.leaderboard_size).await?;
        let entries = rank_entries(users);

        let my_rank = match user_id {
            Some(id) => match self.users.find_by_id(id).await? {
                Some(user) => Some(self.profiles.rank_of(user.profile.points).await?),
                None => None,
            },
            None => None,
        };

        Ok(LeaderboardDto { entries, my_rank })
    }

    pub async fn list_users(&self, page: &PageQuery) -> AppResult<UserPage> {
        let (offset, limit) = page.bounds();
        let (users, total) = self.users.find_all_paginated(offset, limit).await?;

        Ok(UserPage {
            items: users.into_iter().map(UserDto::from).collect(),
            total,
            offset,
            limit,
        })
    }

    pub async fn set_role(&self, actor_id: &str, target_id: &str, role: UserRole) -> AppResult<UserDto> {
        if actor_id == target_id {
            return Err(AppError::BadRequest("You cannot change your own role".to_string()));
        }

        self.users.set_role(target_id, role).await?;
        log::info!("User {} set role of {} to {:?}", actor_id, target_id, role);
        Ok(self.get_user(target_id).await?.into())
    }

    pub async fn update_user(&self, target_id: &str, request: UpdateUserRequest) -> AppResult<UserDto> {
        request.validate()?;

        let username = request.username.trim();
        let email = request.email.trim().to_lowercase();
        self.ensure_unique(username, &email, Some(target_id)).await?;

        let user = self.users.update_account(target_id, username, &email).await?;
        log::info!("Updated account {}", target_id);
        Ok(user.into())
    }

    pub async fn delete_user(&self, actor_id: &str, target_id: &str) -> AppResult<()> {
        if actor_id == target_id {
            return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
        }

        self.users.delete(target_id).await?;
        log::info!("User {} deleted account {}", actor_id, target_id);
        Ok(())
    }
}
