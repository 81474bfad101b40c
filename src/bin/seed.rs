use clap::{Parser, Subcommand};

use pbmate_server::{
    app_state::AppState,
    config::Config,
    errors::AppResult,
    models::domain::{Category, Difficulty},
    services::today,
};

/// Loads reference data into the PBMate database. Every command is safe to
/// run more than once.
#[derive(Parser)]
#[command(name = "pbmate-seed", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert the built-in easy, medium and hard problems
    Problems,
    /// Insert or refresh the pirate map checkpoints
    Checkpoints,
    /// Create today's daily challenge if it does not exist yet
    DailyChallenge,
    /// Create daily challenges for previous days
    PastChallenges {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Ask the configured model for new problems
    Generate {
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=20))]
        count: u32,
        #[arg(long, default_value = "easy")]
        difficulty: Difficulty,
        #[arg(long, default_value = "arithmetic")]
        category: Category,
    },
    /// Problems, checkpoints and today's daily challenge
    All,
}

async fn run(state: &AppState, command: Command) -> AppResult<()> {
    let seed = &state.seed_service;

    match command {
        Command::Problems => {
            let created = seed.seed_problems().await?;
            println!("Created {} problems", created);
        }
        Command::Checkpoints => {
            let created = seed.seed_checkpoints().await?;
            println!("Map ready ({} new checkpoints)", created);
        }
        Command::DailyChallenge => match seed.seed_daily_challenge(today()).await? {
            Some(challenge) => println!(
                "Daily challenge for {} uses problem {}",
                challenge.date, challenge.problem_id
            ),
            None => println!("No problems available; add problems first"),
        },
        Command::PastChallenges { days } => {
            let created = seed.seed_past_challenges(days, today()).await?;
            println!("Created {} past daily challenges", created);
        }
        Command::Generate {
            count,
            difficulty,
            category,
        } => {
            let report = seed.generate(count, difficulty, category).await?;
            println!(
                "Generated {} problems ({} duplicates, {} discarded lines)",
                report.created, report.duplicates_skipped, report.lines_discarded
            );
        }
        Command::All => {
            let problems = seed.seed_problems().await?;
            let checkpoints = seed.seed_checkpoints().await?;
            let daily = seed.seed_daily_challenge(today()).await?;
            println!(
                "Created {} problems, {} checkpoints; daily challenge {}",
                problems,
                checkpoints,
                if daily.is_some() { "ready" } else { "unavailable" }
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match AppState::new(config).await {
        Ok(state) => run(&state, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        log::error!("Seeding failed: {}", e);
        std::process::exit(1);
    }
}
