//! mdscope: view and edit markdown documents by heading path.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use mdscope::{config, engine::Engine, telemetry};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdscope")]
#[command(about = "View and edit markdown sections by heading path", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a file or one section of it
    View {
        /// Scope as <file>[::<heading>...]
        scope: String,

        /// Truncate output after this many lines
        #[arg(long)]
        max_lines: Option<usize>,
    },
    /// Replace, delete, or insert content
    Edit {
        /// Scope as <file>[::<heading>...]
        scope: String,

        /// New content (read from stdin when neither this nor --content-file is given)
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,

        /// Read new content from a file
        #[arg(long, value_name = "PATH")]
        content_file: Option<PathBuf>,

        /// Insert relative to __FILE_START__, __FILE_END__, a "quoted pattern", or a heading path
        #[arg(long, value_name = "ANCHOR")]
        coscope_with: Option<String>,

        /// Allow removing more lines than the configured limit
        #[arg(long)]
        delete_a_lot: bool,
    },
    /// List every heading with its full path
    Outline {
        /// Markdown file
        file: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> io::Result<()> {
    telemetry::init();
    let args = Args::parse();
    let engine = Engine::new(config::Config::load());

    let output = match args.command {
        Command::View { scope, max_lines } => engine.view(&scope, max_lines),
        Command::Edit {
            scope,
            content,
            content_file,
            coscope_with,
            delete_a_lot,
        } => {
            let content = match (content, content_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            engine.edit(&scope, &content, coscope_with.as_deref(), delete_a_lot)
        }
        Command::Outline { file, json } => engine.outline(&file, json),
    };

    println!("{output}");
    Ok(())
}
