//! examgen CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::SettingsArgs;

#[derive(Parser)]
#[command(
    name = "examgen",
    version,
    about = "Generate balanced, shuffled exam versions from a question bank"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a question bank and show how it is categorized
    Parse {
        /// Question bank (.txt or .docx)
        #[arg(long)]
        input: PathBuf,

        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate exam versions and write a zip package
    Generate {
        /// Question bank (.txt or .docx)
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Answer key overlay (e.g. "1A,2B,3C")
        #[arg(long)]
        answers: Option<String>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: txt, docx
        #[arg(long)]
        format: Option<String>,

        /// Also write each exam with its correct options marked
        #[arg(long)]
        include_answers: bool,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Save the full generation result as JSON next to the package
        #[arg(long)]
        save_json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate a single version for review
    Preview {
        /// Question bank (.txt or .docx)
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Write an HTML preview instead of printing text
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question bank for common formatting problems
    Validate {
        /// Question bank (.txt or .docx)
        #[arg(long)]
        input: PathBuf,
    },

    /// Create starter config and a sample question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examgen=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, json } => commands::parse::execute(input, json),
        Commands::Generate {
            input,
            settings,
            answers,
            seed,
            format,
            include_answers,
            output,
            save_json,
            config,
        } => commands::generate::execute(commands::generate::GenerateArgs {
            input,
            settings,
            answers,
            seed,
            format,
            include_answers,
            output,
            save_json,
            config,
        }),
        Commands::Preview {
            input,
            settings,
            seed,
            output,
            config,
        } => commands::preview::execute(input, settings, seed, output, config),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
