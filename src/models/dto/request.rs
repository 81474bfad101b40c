use async_graphql::InputObject;
use once_cell::sync::Lazy;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::{Category, Difficulty};

static USERNAME_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_]+$").expect("USERNAME_REGEX is a valid regex pattern")
});

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_GENERATED_PER_BATCH: u32 = 20;

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "Password must contain an uppercase letter, a lowercase letter and a digit".into(),
        );
        Err(error)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username may only contain letters, digits and underscores"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AnswerRequest {
    #[validate(length(min = 1, max = 255, message = "Answer must be between 1 and 255 characters"))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct ProblemRequest {
    #[validate(length(min = 1, max = 500))]
    pub question: String,

    #[validate(length(min = 1, max = 255))]
    pub answer: String,

    pub difficulty: Difficulty,
    pub category: Category,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username may only contain letters, digits and underscores"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct GenerateProblemsRequest {
    #[validate(range(min = 1, max = MAX_GENERATED_PER_BATCH))]
    pub count: u32,
    pub difficulty: Difficulty,
    pub category: Category,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Offset and limit clamped to sane bounds.
    pub fn bounds(&self) -> (i64, i64) {
        let offset = self.offset.unwrap_or(0).max(0);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (offset, limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProblemQuery {
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ProblemQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DifficultyQuery {
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: "pirate@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register("jack_sparrow", "BlackPearl1", "BlackPearl1").validate().is_ok());
    }

    #[test]
    fn username_rules() {
        assert!(register("ab", "BlackPearl1", "BlackPearl1").validate().is_err());
        assert!(register("jack sparrow", "BlackPearl1", "BlackPearl1").validate().is_err());
        assert!(register("jack-sparrow", "BlackPearl1", "BlackPearl1").validate().is_err());
    }

    #[test]
    fn password_rules() {
        assert!(register("jack", "Short1", "Short1").validate().is_err());
        assert!(register("jack", "alllowercase1", "alllowercase1").validate().is_err());
        assert!(register("jack", "ALLUPPERCASE1", "ALLUPPERCASE1").validate().is_err());
        assert!(register("jack", "NoDigitsHere", "NoDigitsHere").validate().is_err());
    }

    #[test]
    fn confirmation_must_match() {
        let errors = register("jack", "BlackPearl1", "BlackPearl2")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn answer_length_is_bounded() {
        assert!(AnswerRequest { answer: String::new() }.validate().is_err());
        assert!(AnswerRequest { answer: "x".repeat(256) }.validate().is_err());
        assert!(AnswerRequest { answer: "12".to_string() }.validate().is_ok());
    }

    #[test]
    fn generation_count_is_bounded() {
        let request = |count| GenerateProblemsRequest {
            count,
            difficulty: Difficulty::Easy,
            category: Category::Arithmetic,
        };
        assert!(request(0).validate().is_err());
        assert!(request(21).validate().is_err());
        assert!(request(MAX_GENERATED_PER_BATCH).validate().is_ok());
    }

    #[test]
    fn page_bounds_are_clamped() {
        assert_eq!(PageQuery::default().bounds(), (0, DEFAULT_PAGE_SIZE));
        let page = PageQuery {
            offset: Some(-5),
            limit: Some(10_000),
        };
        assert_eq!(page.bounds(), (0, MAX_PAGE_SIZE));
    }
}
