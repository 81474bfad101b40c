use async_graphql::SimpleObject;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR: &str = "parrot";

/// Points and daily-challenge streak, embedded in the user document so it is
/// created in the same write as the account.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct UserProfile {
    pub points: i64,
    pub current_streak: i64,
    pub last_daily_challenge_date: Option<NaiveDate>,
    pub avatar: String,
}

/// Result of applying a daily completion to a streak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreakUpdate {
    pub previous_date: Option<NaiveDate>,
    pub streak: i64,
    pub changed: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::with_avatar(DEFAULT_AVATAR)
    }
}

impl UserProfile {
    pub fn with_avatar(avatar: &str) -> Self {
        UserProfile {
            points: 0,
            current_streak: 0,
            last_daily_challenge_date: None,
            avatar: avatar.to_string(),
        }
    }

    /// Unconditional; callers choose the amount.
    pub fn award_points(&mut self, amount: i64) {
        self.points += amount;
    }

    /// Streak after completing the daily challenge on `today`.
    pub fn streak_after_completion(&self, today: NaiveDate) -> StreakUpdate {
        let previous_date = self.last_daily_challenge_date;
        let yesterday = today.checked_sub_days(Days::new(1));

        let streak = match previous_date {
            Some(last) if last == today => {
                return StreakUpdate {
                    previous_date,
                    streak: self.current_streak,
                    changed: false,
                };
            }
            Some(last) if Some(last) == yesterday => self.current_streak + 1,
            _ => 1,
        };

        StreakUpdate {
            previous_date,
            streak,
            changed: true,
        }
    }

    pub fn complete_daily_challenge(&mut self, today: NaiveDate) -> StreakUpdate {
        let update = self.streak_after_completion(today);
        self.current_streak = update.streak;
        self.last_daily_challenge_date = Some(today);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn first_completion_starts_streak_at_one() {
        let mut profile = UserProfile::default();
        let update = profile.complete_daily_challenge(date(2024, 3, 10));

        assert!(update.changed);
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.last_daily_challenge_date, Some(date(2024, 3, 10)));
    }

    #[test]
    fn consecutive_days_increment_by_one() {
        let mut profile = UserProfile::default();
        for (offset, day) in (10..15).enumerate() {
            profile.complete_daily_challenge(date(2024, 3, day));
            assert_eq!(profile.current_streak, offset as i64 + 1);
        }
    }

    #[test]
    fn gap_resets_streak() {
        let mut profile = UserProfile::default();
        profile.complete_daily_challenge(date(2024, 3, 10));
        profile.complete_daily_challenge(date(2024, 3, 11));
        profile.complete_daily_challenge(date(2024, 3, 13));

        assert_eq!(profile.current_streak, 1);
    }

    #[test]
    fn same_day_is_a_no_op() {
        let mut profile = UserProfile::default();
        profile.complete_daily_challenge(date(2024, 3, 10));
        profile.complete_daily_challenge(date(2024, 3, 11));
        let update = profile.complete_daily_challenge(date(2024, 3, 11));

        assert!(!update.changed);
        assert_eq!(profile.current_streak, 2);
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let mut profile = UserProfile::default();
        profile.complete_daily_challenge(date(2024, 2, 29));
        profile.complete_daily_challenge(date(2024, 3, 1));

        assert_eq!(profile.current_streak, 2);
    }

    #[test]
    fn date_in_the_future_resets() {
        let mut profile = UserProfile::default();
        profile.complete_daily_challenge(date(2024, 3, 12));
        profile.complete_daily_challenge(date(2024, 3, 11));

        assert_eq!(profile.current_streak, 1);
    }

    #[test]
    fn award_points_accumulates() {
        let mut profile = UserProfile::default();
        profile.award_points(5);
        profile.award_points(20);
        assert_eq!(profile.points, 25);
    }
}
