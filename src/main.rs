use anyhow::Result;
use rawreplay::cli::{parse_args, CliOutcome};
use rawreplay::execute::replay;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let result = match parse_args(std::env::args_os())? {
        CliOutcome::Run(options) => replay(&options).map(|_| ExitCode::SUCCESS),
        CliOutcome::Usage(text) => {
            eprintln!("{}", text);
            Ok(ExitCode::from(2))
        }
    };
    return result;
}
