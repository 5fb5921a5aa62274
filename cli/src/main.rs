//! docx-review - numbered run listing and batch commenting for .docx files

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "docx-review")]
#[command(about = "Read Word documents run by run and add review comments")]
#[command(version)]
pub struct Cli {
    #[arg(long, short, global = true, help = "Log debug details to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List every run of a document with its global ID")]
    Read {
        #[arg(help = "Path to the .docx file")]
        path: PathBuf,
        #[arg(long, help = "Print the listing as JSON")]
        json: bool,
    },
    #[command(about = "Apply a batch of comment requests and save a commented copy")]
    Comment {
        #[arg(help = "Path to the .docx file")]
        path: PathBuf,
        #[arg(long, value_name = "FILE", help = "JSON array of comment requests")]
        batch: PathBuf,
        #[arg(long, help = "Comment author")]
        author: Option<String>,
        #[arg(long, help = "Author initials")]
        initials: Option<String>,
        #[arg(long, help = "Suffix appended to the output file name")]
        suffix: Option<String>,
        #[arg(long, value_name = "FILE", help = "Reviewer settings JSON")]
        config: Option<PathBuf>,
        #[arg(long, value_name = "FILE", help = "Write the commented copy here instead")]
        output: Option<PathBuf>,
        #[arg(long, help = "Print the batch report as JSON")]
        json: bool,
    },
    #[command(about = "Count the comments stored in a document")]
    Verify {
        #[arg(help = "Path to the .docx file")]
        path: PathBuf,
        #[arg(long, default_value = store::settings::DEFAULT_AUTHOR, help = "Author to count")]
        author: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Read { path, json } => commands::read::run(&path, json),
        Commands::Comment {
            path,
            batch,
            author,
            initials,
            suffix,
            config,
            output,
            json,
        } => commands::comment::run(commands::comment::CommentArgs {
            path,
            batch,
            author,
            initials,
            suffix,
            config,
            output,
            json,
        }),
        Commands::Verify { path, author } => commands::verify::run(&path, &author),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(commands::EXIT_FATAL)
        }
    }
}

/// Logs go to stderr so the listing on stdout stays clean
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
