use crate::audit::{run_consistency, run_copy_safety, run_diversity, DiversityArgs};
use crate::commands::{run_analyze, run_questions, run_recommend, AnswerArgs, RecommendArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use teablend::config::AppConfig;
use teablend::error::AppError;
use teablend::{telemetry, Catalog, RecommendationEngine};

#[derive(Parser, Debug)]
#[command(
    name = "teablend",
    about = "Score tea-blend quiz answers and audit the recommendation catalog",
    version
)]
pub(crate) struct Cli {
    /// Catalog document to use instead of the bundled one
    #[arg(long, global = true)]
    pub(crate) catalog: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Rank the teas for an answer set
    Recommend(RecommendArgs),
    /// Show the preference profile for an answer set
    Analyze(AnswerArgs),
    /// List the question bank with its option values
    Questions,
    /// Run an offline audit
    Audit {
        #[command(subcommand)]
        command: AuditCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum AuditCommand {
    /// Check signal wiring between questions, the signal map and tea affinities
    Consistency,
    /// Run the synthetic scenario battery and check recommendation spread
    Diversity(DiversityArgs),
    /// Screen catalog and result copy for health claims
    Copy,
}

pub(crate) fn run() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let loaded;
    let catalog = match cli.catalog.or(config.catalog_path) {
        Some(path) => {
            loaded = Catalog::from_path(&path)?;
            &loaded
        }
        None => Catalog::bundled()?,
    };
    let engine = RecommendationEngine::new(catalog, config.engine);

    match cli.command {
        Command::Recommend(args) => run_recommend(&engine, args),
        Command::Analyze(args) => run_analyze(&engine, args),
        Command::Questions => run_questions(catalog),
        Command::Audit { command } => match command {
            AuditCommand::Consistency => run_consistency(catalog),
            AuditCommand::Diversity(args) => run_diversity(&engine, args),
            AuditCommand::Copy => run_copy_safety(&engine),
        },
    }
}
