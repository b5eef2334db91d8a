use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use teablend::catalog::{QuestionAxis, QuestionKind};
use teablend::engine::ResultNarrative;
use teablend::error::AppError;
use teablend::{AnswerSet, Catalog, Recommendation, RecommendationEngine};
use tracing::warn;

#[derive(Args, Debug, Default)]
pub(crate) struct AnswerArgs {
    /// JSON file mapping question ids to a value or a list of values
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Inline answer as question=value or question=value,value; overrides the file
    #[arg(long)]
    pub(crate) answer: Vec<String>,
    /// Reject answer sets that do not answer every question with known options
    #[arg(long)]
    pub(crate) strict: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    #[command(flatten)]
    pub(crate) answers: AnswerArgs,
    /// Include the composed result-page copy
    #[arg(long)]
    pub(crate) narrative: bool,
}

#[derive(Serialize)]
struct RecommendOutput {
    #[serde(flatten)]
    recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    narrative: Option<ResultNarrative>,
}

#[derive(Serialize)]
struct QuestionView<'a> {
    id: &'a str,
    axis: QuestionAxis,
    kind: QuestionKind,
    title: &'a str,
    options: Vec<OptionView<'a>>,
}

#[derive(Serialize)]
struct OptionView<'a> {
    value: &'a str,
    label: &'a str,
}

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(crate) fn load_answers(catalog: &Catalog, args: &AnswerArgs) -> Result<AnswerSet, AppError> {
    let mut answers = match &args.answers {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => AnswerSet::new(),
    };

    let inline = AnswerSet::from_pairs(&args.answer)?;
    for (question, answer) in inline.iter() {
        answers.insert(question, answer.clone());
    }

    if args.strict {
        if let Err(err) = answers.validate(catalog) {
            warn!(issues = err.issues.len(), "answer set rejected");
            return Err(err.into());
        }
    }

    Ok(answers)
}

pub(crate) fn run_recommend(
    engine: &RecommendationEngine<'_>,
    args: RecommendArgs,
) -> Result<ExitCode, AppError> {
    let answers = load_answers(engine.catalog(), &args.answers)?;

    let output = if args.narrative {
        let (recommendation, narrative) = engine.recommend_with_narrative(&answers);
        RecommendOutput {
            recommendation,
            narrative,
        }
    } else {
        RecommendOutput {
            recommendation: engine.recommend(&answers),
            narrative: None,
        }
    };

    print_json(&output)?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn run_analyze(
    engine: &RecommendationEngine<'_>,
    args: AnswerArgs,
) -> Result<ExitCode, AppError> {
    let answers = load_answers(engine.catalog(), &args)?;
    print_json(&engine.analyze(&answers))?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn run_questions(catalog: &Catalog) -> Result<ExitCode, AppError> {
    let questions: Vec<QuestionView<'_>> = catalog
        .questions
        .iter()
        .map(|question| QuestionView {
            id: &question.id,
            axis: question.axis,
            kind: question.kind,
            title: &question.title,
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    value: &option.value,
                    label: &option.label,
                })
                .collect(),
        })
        .collect();

    print_json(&questions)?;
    Ok(ExitCode::SUCCESS)
}
