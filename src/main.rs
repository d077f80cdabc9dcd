use std::process::ExitCode;

fn main() -> ExitCode {
    match svg2png::cli::run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
