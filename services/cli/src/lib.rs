mod audit;
mod cli;
mod commands;

use std::process::ExitCode;
use teablend::error::AppError;

pub fn run() -> Result<ExitCode, AppError> {
    cli::run()
}
