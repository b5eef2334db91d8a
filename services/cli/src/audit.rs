use crate::commands::print_json;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io;
use std::process::ExitCode;
use teablend::audit::{
    check_result_copy, run_consistency_audit, run_diversity_audit, sample_cases, scan_catalog,
    scenarios, AuditStatus, CopySafetyReport, DiversityThresholds, ResultCopyRow, Stamped,
};
use teablend::error::AppError;
use teablend::{Catalog, RecommendationEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DiversityArgs {
    /// Output format for the report
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    pub(crate) format: ReportFormat,
}

#[derive(Serialize)]
struct CopyAuditOutput {
    catalog: CopySafetyReport,
    result_copy: Vec<ResultCopyRow>,
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

pub(crate) fn run_consistency(catalog: &Catalog) -> Result<ExitCode, AppError> {
    let report = run_consistency_audit(catalog);
    let failed = report.status == AuditStatus::Fail;
    print_json(&Stamped::now(report))?;
    Ok(exit_code(failed))
}

pub(crate) fn run_diversity(
    engine: &RecommendationEngine<'_>,
    args: DiversityArgs,
) -> Result<ExitCode, AppError> {
    let battery = scenarios()?;
    let report = run_diversity_audit(engine, &battery, &DiversityThresholds::default())?;
    let failed = report.hard_fail;

    match args.format {
        ReportFormat::Json => print_json(&Stamped::now(report))?,
        ReportFormat::Csv => report.write_csv(io::stdout().lock())?,
    }

    Ok(exit_code(failed))
}

pub(crate) fn run_copy_safety(engine: &RecommendationEngine<'_>) -> Result<ExitCode, AppError> {
    let catalog = scan_catalog(engine.catalog());
    let result_copy = check_result_copy(engine, &sample_cases()?);
    let failed = catalog.status == AuditStatus::Fail
        || result_copy.iter().any(|row| row.has_health_claim);

    print_json(&Stamped::now(CopyAuditOutput {
        catalog,
        result_copy,
    }))?;
    Ok(exit_code(failed))
}
