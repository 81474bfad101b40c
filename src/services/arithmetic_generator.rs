//! Random arithmetic exercises for the practice page.

use std::ops::RangeInclusive;

use rand::{seq::SliceRandom, Rng};

use crate::models::{domain::Difficulty, dto::response::GeneratedProblemDto};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
        }
    }

    fn apply(self, left: i64, right: i64) -> i64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
        }
    }
}

struct Profile {
    left: RangeInclusive<i64>,
    right: RangeInclusive<i64>,
    // repeated entries weight the draw
    operators: &'static [Operator],
}

fn profile(difficulty: Difficulty) -> Profile {
    use Operator::*;

    match difficulty {
        Difficulty::Easy => Profile {
            left: 1..=10,
            right: 1..=10,
            operators: &[Add, Subtract, Multiply],
        },
        Difficulty::Medium => Profile {
            left: 10..=50,
            right: 5..=25,
            operators: &[Add, Subtract, Multiply, Add, Subtract],
        },
        Difficulty::Hard => Profile {
            left: 20..=100,
            right: 10..=50,
            operators: &[Add, Subtract, Multiply, Multiply, Multiply],
        },
    }
}

pub fn generate(difficulty: Difficulty) -> GeneratedProblemDto {
    generate_with(&mut rand::thread_rng(), difficulty)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> GeneratedProblemDto {
    let profile = profile(difficulty);
    let mut left = rng.gen_range(profile.left);
    let mut right = rng.gen_range(profile.right);
    let operator = profile
        .operators
        .choose(rng)
        .copied()
        .unwrap_or(Operator::Add);

    if operator == Operator::Subtract {
        if left < right {
            std::mem::swap(&mut left, &mut right);
        }
        if difficulty == Difficulty::Easy && left == right {
            left += rng.gen_range(1..=5);
        }
    }

    GeneratedProblemDto {
        question: format!("{} {} {}", left, operator.symbol(), right),
        answer: operator.apply(left, right).to_string(),
        difficulty,
    }
}
