use anyhow::Result;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::process::ExitCode;
use weektodo::cli::{self, Command};
use weektodo::config::Config;
use weektodo::context::StandardContext;
use weektodo::controller::{self, Outcome};

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .add_filter_allow_str("weektodo")
        .build();
    // Only fails when a logger is already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'weektodo --help' for usage.");
            return Ok(ExitCode::from(2));
        }
    };

    init_logging(cli.verbose);
    let ctx = StandardContext::new(cli.root.clone());

    match cli.command {
        Command::Help => {
            cli::print_help("weektodo");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { schedule_path } => {
            let config = Config::load_or_default(&ctx)?;
            let names = config.day_names()?;
            let path = match schedule_path {
                Some(p) => p,
                None => config.schedule_path(&ctx)?,
            };
            let invalid = controller::check(&path, &names)?;
            if invalid.is_empty() {
                println!("{}: OK", path.display());
                return Ok(ExitCode::SUCCESS);
            }
            for entry in &invalid {
                println!("{}", entry);
            }
            println!("Expected one of: {}", names.expected());
            Ok(ExitCode::FAILURE)
        }
        Command::Run(options) => {
            let config = Config::load_or_default(&ctx)?;
            match controller::run(&ctx, &config, &options).await? {
                Outcome::DryRun(items) => {
                    for item in items {
                        println!("{}", item);
                    }
                }
                Outcome::Synced(report) => {
                    println!("Added {} task(s)", report.added.len());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
