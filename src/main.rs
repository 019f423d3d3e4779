mod app;
mod cli;
mod diagnostics;
mod maint_config;
mod maint_error;
mod plan;
mod test_suite;
mod util;
use clap::Parser;
use cli::Commands;
use maint_config::MaintConfig;

use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;

use crate::cli::Cli;
use crate::diagnostics::Observation;
use crate::test_suite::TestType;

fn main() {
    app::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        exit(1)
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(app::DEFAULT_CONFIG_FILE));
    let config = MaintConfig::load(&config_path)?;
    app::enable_logging(config.log_level());

    match &cli.command {
        /* Cleanup drivers */
        Some(Commands::Purge { inspect }) => {
            config.purge_plan().run(&config.data_root()?, *inspect)?;
        }
        Some(Commands::Reset { inspect }) => {
            config.reset_plan().run(&config.data_root()?, *inspect)?;
        }
        Some(Commands::Run { inspect }) => {
            let plan = config.custom_plan();
            if plan.steps.is_empty() {
                eprintln!("No steps configured in {}", config_path.display());
                exit(1)
            }
            plan.run(&config.data_root()?, *inspect)?;
        }
        /* Ad hoc targets */
        Some(Commands::Rm { paths }) => {
            for path in paths {
                util::remove_dir(path)?;
            }
        }
        Some(Commands::Clear { paths }) => {
            for path in paths {
                util::clear_dir_contents(path)?;
            }
        }
        Some(Commands::Ls { dir, context }) => {
            match diagnostics::log_directory_contents(dir, context) {
                Observation::Observed(listing) => println!(
                    "{} entries in {}",
                    listing.count(),
                    listing.directory.display()
                ),
                Observation::Absent => println!("Directory does not exist: {}", dir.display()),
                Observation::Failed(reason) => eprintln!("Could not list {}: {}", dir.display(), reason),
            }
        }
        Some(Commands::Targets) => {
            let data_root = config.data_root()?;
            println!("purge");
            println!("{}", config.purge_plan().render_table(&data_root));
            println!("reset");
            println!("{}", config.reset_plan().render_table(&data_root));
            if !config.steps.is_empty() {
                println!("run");
                println!("{}", config.custom_plan().render_table(&data_root));
            }
        }
        /* Test suite */
        Some(Commands::Test {
            test_type,
            no_coverage,
        }) => {
            let name = test_type.as_deref().unwrap_or("all");
            let test_type = match TestType::from_str(name) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("{}", e);
                    eprintln!("Valid test types: {}", TestType::NAMES.join(", "));
                    exit(1)
                }
            };
            exit(test_suite::run_tests(&config.tests, test_type, !no_coverage))
        }
        None => {
            println!("No command given, see --help");
        }
    }
    Ok(())
}
