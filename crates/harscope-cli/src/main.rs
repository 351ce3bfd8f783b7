use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use harscope_cli::OutputFormat;
use harscope_cli::commands;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "harscope")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Diagnose browser network captures stored as HTTP Archive (HAR) files",
    long_about = "harscope reads a HAR capture and reports aggregate statistics, per-request detail, \
                  failure diagnoses with remediation hints, traffic anomalies, domain and content-type \
                  breakdowns, and a request timeline."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        env = "HARSCOPE_FORMAT",
        default_value_t = OutputFormat::Pretty
    )]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a HAR file and print the diagnostic report
    Analyze {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reject files larger than this many bytes
        #[arg(
            long,
            env = "HARSCOPE_MAX_BYTES",
            default_value_t = commands::analyze::DEFAULT_MAX_BYTES
        )]
        max_bytes: u64,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for harscope.

SUPPORTED SHELLS:
  bash, zsh, fish, powershell, elvish

INSTALLATION:
  Bash:  harscope completion --shell bash >> ~/.bashrc
  Zsh:   harscope completion --shell zsh > \"${fpath[1]}/_harscope\"
  Fish:  harscope completion --shell fish > ~/.config/fish/completions/harscope.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze { file, max_bytes } => {
            commands::analyze::execute(&file, max_bytes, cli.format).await
        }
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "harscope=debug,harscope_cli=debug,harscope_core=debug,harscope_detectors=debug",
        )
    } else {
        EnvFilter::new("harscope=info,harscope_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
