//! # serpens CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use serpens_cli::check::{run_check, CheckArgs};
use serpens_cli::load::{run_load, LoadArgs};
use serpens_cli::types::{run_types, TypesArgs};

/// serpens: load, validate and dump JSON documents against declared record types.
#[derive(Parser, Debug)]
#[command(name = "serpens", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a JSON document and print its canonical dump.
    Load(LoadArgs),

    /// Validate a JSON document and report every problem.
    Check(CheckArgs),

    /// List the enums and records declared in a catalog.
    Types(TypesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays machine-readable.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!("serpens CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Load(args) => run_load(args),
        Commands::Check(args) => run_check(args),
        Commands::Types(args) => run_types(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_load() {
        let cli = Cli::try_parse_from([
            "serpens",
            "load",
            "--catalog",
            "staff.yaml",
            "--record",
            "EmployeeSchema",
            "employee.json",
        ])
        .unwrap();
        if let Commands::Load(args) = cli.command {
            assert_eq!(args.catalog.catalog, PathBuf::from("staff.yaml"));
            assert_eq!(args.record, "EmployeeSchema");
            assert_eq!(args.input, PathBuf::from("employee.json"));
            assert!(!args.many);
            assert!(!args.decimal_as_string);
        } else {
            panic!("expected load");
        }
    }

    #[test]
    fn cli_parse_load_all_flags() {
        let cli = Cli::try_parse_from([
            "serpens",
            "-vv",
            "load",
            "--catalog",
            "staff.yaml",
            "--record",
            "EmployeeSchema",
            "--many",
            "--decimal-as-string",
            "--pretty",
            "-",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.log_json);
        if let Commands::Load(args) = cli.command {
            assert!(args.many);
            assert!(args.decimal_as_string);
            assert!(args.pretty);
            assert_eq!(args.input, PathBuf::from("-"));
        } else {
            panic!("expected load");
        }
    }

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from([
            "serpens", "check", "--catalog", "c.json", "--record", "P", "--many", "in.json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Check(ref a) if a.many));
    }

    #[test]
    fn cli_parse_types() {
        let cli = Cli::try_parse_from(["serpens", "types", "--catalog", "c.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Types(_)));
    }

    #[test]
    fn cli_parse_load_requires_record() {
        let result =
            Cli::try_parse_from(["serpens", "load", "--catalog", "c.yaml", "in.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_verbose_levels() {
        for (flag, level) in [("-v", 1), ("-vv", 2), ("-vvv", 3)] {
            let cli =
                Cli::try_parse_from(["serpens", flag, "types", "--catalog", "c.yaml"]).unwrap();
            assert_eq!(cli.verbose, level);
        }
    }

    #[test]
    fn cli_parse_log_json_after_subcommand() {
        let cli =
            Cli::try_parse_from(["serpens", "types", "--catalog", "c.yaml", "--log-json"]).unwrap();
        assert!(cli.log_json);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["serpens"]).is_err());
    }
}
