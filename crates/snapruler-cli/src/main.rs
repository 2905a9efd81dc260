//! `snapruler`: replay a gesture script and print the resulting session as JSON.
//!
//! ```text
//! snapruler <script.json> [--config <config.json>]
//! ```

mod script;

use snapruler_core::{SessionConfig, SnapRulerError};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}\nusage: snapruler <script.json> [--config <config.json>]")]
    Usage(String),
    #[error(transparent)]
    Engine(#[from] SnapRulerError),
}

#[derive(Debug, PartialEq)]
struct Args {
    script: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let mut script = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--config needs a path".to_string()))?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option {flag}")));
            }
            _ if script.is_some() => {
                return Err(CliError::Usage(format!("unexpected argument {arg}")));
            }
            _ => script = Some(PathBuf::from(&arg)),
        }
    }
    let script = script.ok_or_else(|| CliError::Usage("missing script path".to_string()))?;
    Ok(Args { script, config })
}

fn run() -> Result<(), CliError> {
    let args = parse_args(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let script = script::Script::load(&args.script)?;

    let result = script::replay(&script, config);
    log::info!(
        "Replayed {} steps: {} shapes, {} snap locks",
        script.steps.len(),
        result.session.shapes().len(),
        result.snap_locks
    );

    let json = serde_json::to_string_pretty(&result.session.snapshot()).map_err(SnapRulerError::from)?;
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
