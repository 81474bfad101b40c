pub const PROBLEM_GENERATOR_SYSTEM_PROMPT: &str = "You are a math problem generator.";

/// Placeholders: `{count}`, `{difficulty}`, `{category}`.
pub const PROBLEM_GENERATOR_PROMPT: &str = "Generate {count} {difficulty} {category} math problems for students.

Rules:
- Return exactly one problem per line and nothing else.
- Each line has exactly four fields separated by a pipe character: question|answer|difficulty|category
- difficulty is one of: easy, medium, hard
- category is one of: arithmetic, algebra, fractions
- Answers are a single integer, a decimal number, or a fraction written as a/b in lowest terms.
- Do not number the lines and do not use the pipe character inside a question or answer.

Example:
12 + 7|19|easy|arithmetic
Solve for x: 3x + 4 = 19|5|medium|algebra
1/2 + 1/3|5/6|medium|fractions";

pub fn problem_generator_prompt(count: u32, difficulty: &str, category: &str) -> String {
    PROBLEM_GENERATOR_PROMPT
        .replace("{count}", &count.to_string())
        .replace("{difficulty}", difficulty)
        .replace("{category}", category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_placeholders_are_filled() {
        let prompt = problem_generator_prompt(5, "hard", "algebra");
        assert!(prompt.starts_with("Generate 5 hard algebra math problems"));
        assert!(!prompt.contains("{count}"));
    }
}
