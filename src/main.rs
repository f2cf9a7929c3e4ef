use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use contractdraft::commands::{
    draft_contract, init_project, list_contract_types, print_validation_result, validate_project,
    DraftOptions,
};
use contractdraft::core::{load_config, load_credential};
use contractdraft::models::{Config, ConfigOverrides};

/// ContractDraft - draft contracts from typed templates with Gemini
#[derive(Parser)]
#[command(name = "contractdraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ContractDraft project
    Init {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// List available contract types
    List {
        /// Show the fields of each contract type
        #[arg(short = 'f', long = "fields")]
        fields: bool,
    },

    /// Check the config file and all contract types
    Validate,

    /// Fill in a contract type and generate the contract
    Draft {
        /// Contract type name or slug (prompted for if omitted)
        contract_type: Option<String>,

        /// Field value as KEY=VALUE (key or label; repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// YAML file mapping field names to values
        #[arg(long)]
        values: Option<PathBuf>,

        /// Do not prompt; unset fields use their defaults
        #[arg(long)]
        no_input: bool,

        /// Print the prompt without calling the API
        #[arg(long)]
        dry_run: bool,

        /// Also write the generated contract to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the model to use
        #[arg(long)]
        model: Option<String>,

        /// Override the API base URL
        #[arg(long)]
        url: Option<String>,

        /// Override the timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Override the number of attempts
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Print the contract as it streams in
        #[arg(long)]
        stream: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    // Only fails if a global subscriber is already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn current_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("Failed to determine the current directory")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_root = match path {
                Some(p) => p,
                None => current_dir()?,
            };
            init_project(&project_root)?;
        }

        Commands::List { fields } => {
            let project_root = current_dir()?;
            let config = Config::load_from_dir(&project_root)?;
            list_contract_types(&project_root, &config, fields || cli.verbose)?;
        }

        Commands::Validate => {
            let project_root = current_dir()?;
            let result = validate_project(&project_root)?;
            print_validation_result(&result);
            if !result.valid {
                std::process::exit(1);
            }
        }

        Commands::Draft {
            contract_type,
            set,
            values,
            no_input,
            dry_run,
            output,
            model,
            url,
            timeout,
            max_attempts,
            stream,
        } => {
            let project_root = current_dir()?;
            let overrides = ConfigOverrides {
                model,
                url,
                timeout,
                max_attempts,
                stream,
            };
            let config = load_config(&project_root, overrides)?;
            let credential = load_credential(&project_root, &config);

            let options = DraftOptions {
                contract_type,
                assignments: set,
                values_file: values,
                no_input,
                dry_run,
                output,
            };
            draft_contract(&project_root, &config, credential, options).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
