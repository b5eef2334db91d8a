use teablend_cli::run;

fn main() -> std::process::ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("application error: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
