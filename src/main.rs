use clap::error::ErrorKind;
use clap::Parser;
use gcodegoblin::{init_logging, load_config, run, usage, Cli, Layout};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            if err.kind() != ErrorKind::MissingRequiredArgument {
                eprintln!("{}", err);
            }
            println!("{}", usage(&Layout::default()));
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(cli.log_level(config.logging.level)) {
        eprintln!("warning: {:#}", err);
    }

    match run(&cli, &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if err.is_usage_error() => {
            println!("ERROR: {}", err);
            println!("{}", usage(&config.layout));
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
