pub mod prompts;
pub mod seed_data;
