//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `realworld_core` linkage.
//! - Open a migrated in-memory store and report its schema version.

use clap::Parser;
use log::info;
use realworld_core::db::migrations::{current_user_version, latest_version};
use realworld_core::{core_version, default_log_level, init_logging, open_db_in_memory, ping};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "realworld_cli")]
#[command(about = "Smoke check for the realworld content core", long_about = None)]
#[command(version)]
struct Cli {
    /// Absolute directory for rolling log files; logging stays off without it.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("realworld_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if let Some(dir) = cli.log_dir.as_deref() {
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", dir.display()))?;
        init_logging(default_log_level(), dir)?;
    }

    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let schema_version = current_user_version(&conn).map_err(|err| err.to_string())?;
    info!("event=cli_smoke module=cli status=ok schema_version={schema_version}");

    println!("realworld_core ping={}", ping());
    println!("realworld_core version={}", core_version());
    println!("schema version={schema_version} latest={}", latest_version());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::{CommandFactory, Parser};
    use std::path::Path;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_dir_is_optional() {
        let cli = Cli::try_parse_from(["realworld_cli"]).unwrap();
        assert!(cli.log_dir.is_none());

        let cli = Cli::try_parse_from(["realworld_cli", "--log-dir", "/tmp/realworld"]).unwrap();
        assert_eq!(cli.log_dir.as_deref(), Some(Path::new("/tmp/realworld")));
    }

    #[test]
    fn log_dir_flag_requires_a_value() {
        assert!(Cli::try_parse_from(["realworld_cli", "--log-dir"]).is_err());
    }
}
