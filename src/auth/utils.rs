use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

/// Admin-only operations: user management, problem editing and generation.
pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if claims.is_admin() {
        return Ok(());
    }
    log::info!("User {} was refused an admin action", claims.username);
    Err(AppError::Forbidden(
        "This action requires the admin role".to_string(),
    ))
}

/// Per-user data such as submission history is visible to its owner and to
/// admins.
pub fn require_owner_or_admin(claims: &Claims, owner_id: &str) -> AppResult<()> {
    if claims.is_admin() || claims.user_id() == owner_id {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You can only view your own records".to_string(),
    ))
}

/// Claims placed in the GraphQL context by the HTTP handler, if the request
/// carried a valid token.
pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data_opt::<Claims>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{test_admin, test_user};

    #[test]
    fn admins_pass_the_admin_check() {
        let admiral = Claims::new(&test_admin(), 1);
        assert!(require_admin(&admiral).is_ok());
    }

    #[test]
    fn sailors_are_forbidden_admin_actions() {
        let sailor = Claims::new(&test_user(), 1);
        assert!(matches!(require_admin(&sailor), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn owners_reach_their_own_history() {
        let user = test_user();
        let claims = Claims::new(&user, 1);
        assert!(require_owner_or_admin(&claims, &user.id).is_ok());
    }

    #[test]
    fn admins_reach_any_history() {
        let other = test_user();
        let admiral = Claims::new(&test_admin(), 1);
        assert!(require_owner_or_admin(&admiral, &other.id).is_ok());
    }

    #[test]
    fn other_users_history_is_forbidden() {
        let owner = test_user();
        let intruder = Claims::new(&test_user(), 1);
        assert_ne!(intruder.sub, owner.id);
        assert!(matches!(
            require_owner_or_admin(&intruder, &owner.id),
            Err(AppError::Forbidden(_))
        ));
    }
}
