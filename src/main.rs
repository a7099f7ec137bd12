
use glove_cooc::{Config, CoocError, Run, USAGE};

use std::env;
use std::process::ExitCode;
use env_logger::Env;


fn main() -> ExitCode {

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args: Vec<String> = env::args().collect();

    let params = match Config::new(&args) {
        Ok(config) => config.get_params(),
        Err(e @ CoocError::Argument(_)) => {
            let program = args.first().map(String::as_str).unwrap_or("glove_cooc");
            eprintln!("{}", e);
            eprintln!("Usage: {} {}", program, USAGE);
            return ExitCode::from(1)
        },
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1)
        }
    };

    match Run::run(&params) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
