mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "herbarium",
    version,
    about = "Rebuild plant catalogue records (image, scientific name, common name) from nursery PDFs"
)]
struct Cli {
    /// Log per-page geometry decisions
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one or more categories from a catalogue PDF
    Extract {
        /// Path to the catalogue PDF
        input_file: PathBuf,

        /// Category profile(s) to extract (default: all built-in profiles)
        #[arg(short, long = "profile", value_name = "NAME")]
        profile: Vec<String>,

        /// Page selection overriding the profile's pages, e.g. "4-14" or "17,19"
        #[arg(long, value_name = "PAGES")]
        pages: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write each category to DIR/<slug>/ (images, plants.json, README.md) and DIR/catalogue.json
        #[arg(short = 'O', long = "out", value_name = "DIR")]
        out: Option<PathBuf>,

        /// URL prefix for image paths in plants.json
        #[arg(long, default_value = "/catalogue")]
        url_root: String,
    },
    /// Dump the positioned text and images of one page
    Inspect {
        /// Path to the catalogue PDF
        input_file: PathBuf,

        /// 1-based page number
        #[arg(long)]
        page: usize,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// List and explain built-in category profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List built-in profiles
    List,
    /// Show a profile's pages, mode and thresholds
    Explain {
        /// Profile name (e.g., "flowering-shrubs")
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            profile,
            pages,
            output,
            out,
            url_root,
        } => commands::extract::run(input_file, profile, pages, &output, out, &url_root),
        Commands::Inspect {
            input_file,
            page,
            output,
        } => commands::inspect::run(input_file, page, &output),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Explain { name } => commands::profiles::explain(&name),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
