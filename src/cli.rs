// File: ./src/cli.rs
//! Command-line parsing and help text.
use crate::controller::RunOptions;
use anyhow::{Result, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Validate the schedule and report every bad day token.
    Check { schedule_path: Option<PathBuf> },
    Run(RunOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub verbose: bool,
}

/// Parses the arguments after the binary name.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut root = None;
    let mut verbose = false;
    let mut help = false;
    let mut check = false;
    let mut options = RunOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => help = true,
            "-v" | "--verbose" => verbose = true,
            "--dry-run" => options.dry_run = true,
            "-r" | "--root" => match iter.next() {
                Some(path) => root = Some(PathBuf::from(path)),
                None => bail!("{} requires a path", arg),
            },
            "--day" => match iter.next() {
                Some(day) => options.day = Some(day.clone()),
                None => bail!("--day requires a day name"),
            },
            "check" if !check && options.schedule_path.is_none() => check = true,
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("Unknown option '{}'", flag),
            path => {
                if options.schedule_path.is_some() {
                    bail!("Unexpected argument '{}'", path);
                }
                options.schedule_path = Some(PathBuf::from(path));
            }
        }
    }

    let command = if help {
        Command::Help
    } else if check {
        if options.day.is_some() || options.dry_run {
            bail!("--day and --dry-run do not apply to 'check'");
        }
        Command::Check {
            schedule_path: options.schedule_path,
        }
    } else {
        Command::Run(options)
    };

    Ok(Cli {
        command,
        root,
        verbose,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Weektodo v{} - Push this weekday's recurring chores into Google Tasks",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [schedule.json]", binary_name);
    println!("    {} check [schedule.json]    (takes only -r and -v)", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    --day <Mon..Sun>      Resolve for this day instead of today.");
    println!("    --dry-run             Print the due tasks without sending them.");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Debug logging.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("SCHEDULE FORMAT (JSON, or TOML for .toml files):");
    println!("    {{");
    println!("      \"Home\": {{ \"Trash\": [\"Mon\", \"Thu\"], \"Laundry\": [\"Sat\"] }},");
    println!("      \"Work\": {{ \"Timesheet\": [\"Fri\"] }}");
    println!("    }}");
    println!();
    println!("    Days are the abbreviations of the configured day_locale (Mon..Sun by default).");
    println!("    Without a path, schedule_path from the config or <data dir>/tasks.json is used.");
    println!();
    println!("CONFIG (config.toml):");
    println!("    client_id, client_secret, refresh_token   OAuth credentials");
    println!("    access_token                              Use this token instead of refreshing");
    println!("    create_missing_lists = true               Create task lists that do not exist");
    println!("    schedule_path = \"...\"                     Default schedule location");
    println!("    day_locale = \"system\" | \"de_DE\" | ...     Locale of the day abbreviations");
}
