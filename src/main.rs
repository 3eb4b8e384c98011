#![allow(unused_assignments)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use swaggen::{generate_client, generate_definitions, GenOpts};

/// Swagger 2.0 code generator
///
/// Generates statically typed Go models and clients from a specification
/// document.
#[derive(Parser)]
#[command(name = "swaggen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SharedArgs {
    /// Path to the specification document (JSON or YAML)
    #[arg(short = 'f', long)]
    spec: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    target: PathBuf,

    /// Package for the operations
    #[arg(long, default_value = "operations")]
    api_package: String,

    /// Package for the data models
    #[arg(long, default_value = "models")]
    model_package: String,

    /// Package for the server scaffolding
    #[arg(long, default_value = "restapi")]
    server_package: String,

    /// Package for the client scaffolding
    #[arg(long, default_value = "client")]
    client_package: String,

    /// Dump the generation tree as JSON instead of writing files
    #[arg(long)]
    dump_data: bool,
}

impl SharedArgs {
    fn into_opts(self, principal: Option<String>) -> GenOpts {
        GenOpts {
            spec: self.spec,
            target: self.target,
            api_package: self.api_package,
            model_package: self.model_package,
            server_package: self.server_package,
            client_package: self.client_package,
            principal,
            dump_data: self.dump_data,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model files from the definitions in a specification
    Model {
        #[command(flatten)]
        shared: SharedArgs,

        /// Generate only the named model (repeatable)
        #[arg(short = 'm', long = "model")]
        models: Vec<String>,
    },

    /// Generate a client: models, per-tag operation clients, and a facade
    Client {
        #[command(flatten)]
        shared: SharedArgs,

        /// Application name, defaults to a mangled form of info.title
        #[arg(short = 'A', long)]
        name: Option<String>,

        /// Include only the named operation (repeatable)
        #[arg(short = 'O', long = "operation")]
        operations: Vec<String>,

        /// Include only the named model (repeatable)
        #[arg(short = 'm', long = "model")]
        models: Vec<String>,

        /// Model to use as the security principal
        #[arg(long)]
        principal: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Model { shared, models } => {
            generate_definitions(&models, &shared.into_opts(None))
        }
        Commands::Client {
            shared,
            name,
            operations,
            models,
            principal,
        } => generate_client(
            name.as_deref(),
            &models,
            &operations,
            &shared.into_opts(principal),
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::FAILURE
        }
    }
}
