//! Answer comparison.
//!
//! The canonical answer is parsed once into an [`AnswerValue`]; a submission is
//! then compared as an integer if both sides are integers, as a float if both
//! sides are numbers, and otherwise as trimmed text. Parse failures never
//! escape, they fall through to the next tier.

#[derive(Clone, Debug, PartialEq)]
pub enum AnswerValue {
    /// Canonical decimal form: no leading zeros, `-` only for non-zero values.
    /// Kept as text so integers of any width compare exactly.
    Integer(String),
    Float(f64),
    Text(String),
}

/// Normalizes an optionally signed run of ASCII digits. `None` for anything
/// else, including an empty digit run.
fn parse_integer(raw: &str) -> Option<String> {
    let (negative, digits) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    Some(match (negative, digits.is_empty()) {
        (_, true) => "0".to_string(),
        (true, false) => format!("-{}", digits),
        (false, false) => digits.to_string(),
    })
}

impl AnswerValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(value) = parse_integer(trimmed) {
            AnswerValue::Integer(value)
        } else if let Ok(value) = trimmed.parse::<f64>() {
            AnswerValue::Float(value)
        } else {
            AnswerValue::Text(trimmed.to_string())
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            AnswerValue::Integer(value) => value.parse().ok(),
            AnswerValue::Float(value) => Some(*value),
            AnswerValue::Text(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalAnswer {
    raw: String,
    value: AnswerValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub correct_answer: String,
}

impl CanonicalAnswer {
    pub fn new(raw: &str) -> Self {
        CanonicalAnswer {
            raw: raw.trim().to_string(),
            value: AnswerValue::parse(raw),
        }
    }

    pub fn value(&self) -> &AnswerValue {
        &self.value
    }

    pub fn matches(&self, submitted: &str) -> bool {
        let submitted = submitted.trim();

        if let AnswerValue::Integer(expected) = &self.value {
            if let Some(actual) = parse_integer(submitted) {
                return &actual == expected;
            }
        }

        if let Some(expected) = self.value.as_float() {
            if let Ok(actual) = submitted.parse::<f64>() {
                return actual == expected;
            }
        }

        submitted == self.raw
    }
}

/// Checks `submitted` against `canonical`, returning the trimmed canonical
/// answer alongside the verdict.
pub fn check(submitted: &str, canonical: &str) -> AnswerCheck {
    let canonical = CanonicalAnswer::new(canonical);
    AnswerCheck {
        is_correct: canonical.matches(submitted),
        correct_answer: canonical.raw,
    }
}
