use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ycompose::commands::compose::{self, ComposeArgs};

/// Environment variable holding the log filter
const LOG_ENV: &str = "YCOMPOSE_LOG";

#[derive(Parser)]
#[command(name = "ycompose")]
#[command(about = "Compose YAML documents from reusable scenario libraries", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply scenarios to a template and print the result
    ///
    /// Arguments after `--` are passed to the interpolator:
    /// -v name=value, -l vars.yml, --var-file name=path, --vars-env PREFIX,
    /// --vars-store path and -o ops.yml.
    Compose {
        /// Config file (default: ycompose.toml in the working directory, if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Library file to load; repeatable, searched in order
        #[arg(short, long = "library")]
        library: Vec<PathBuf>,

        /// Print each step's parameters to stderr before it runs
        #[arg(long)]
        show_plan: bool,

        /// Print a diff of the document to stderr after each step
        #[arg(long)]
        show_diff: bool,

        /// Write the composed document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Template document to compose
        template: PathBuf,

        /// Scenarios to apply, in order
        scenarios: Vec<String>,

        /// Interpolator arguments
        #[arg(last = true)]
        passthrough: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compose {
            config,
            library,
            show_plan,
            show_diff,
            output,
            template,
            scenarios,
            passthrough,
        } => compose::execute(ComposeArgs {
            config,
            libraries: library,
            show_plan,
            show_diff,
            output,
            template,
            scenarios,
            passthrough,
        }),
    }
}
