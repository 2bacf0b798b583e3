use std::process::ExitCode;

use scmapp::ui::output;

fn main() -> ExitCode {
    match scmapp::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
