use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "px", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a shell command repeatedly
    Loop {
        /// Command to run
        cmd: String,

        /// Seconds to sleep between runs
        #[arg(short, long, default_value_t = 1.0)]
        interval: f64,

        /// Maximum number of runs
        #[arg(short = 'n', long, default_value_t = 360_000)]
        count: u64,
    },

    /// Chat with an OpenAI-compatible model
    Chat {
        /// Model to use (defaults to the configured model)
        #[arg(short, long)]
        model: Option<String>,

        /// Ask for short answers
        #[arg(short, long)]
        quick: bool,
    },

    /// Compile a C file with gcc and run it
    Runc {
        file: PathBuf,

        /// gcc optimization level: 0, 1, 2, 3, s, g or fast
        #[arg(short = 'O', long, default_value = "0")]
        level: String,
    },

    /// List the submodules, types and functions of a Rust module
    #[command(name = "ls-mod")]
    LsMod {
        /// Source file (the .rs suffix is optional) or module directory
        target: PathBuf,
    },

    /// Combine repository files into one Markdown document
    Onefile {
        /// Include spec in gitignore syntax
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "a.md")]
        output: PathBuf,

        /// Show usage examples and exit
        #[arg(long)]
        tldr: bool,
    },

    /// Print lines of a file (or stdin) matching a regex
    Grep {
        pattern: String,

        /// Read this file instead of stdin
        file: Option<PathBuf>,
    },

    /// Replace text in a file in place
    Replace {
        file: PathBuf,
        old: String,
        new: String,

        /// Keep the original as <file><suffix>
        #[arg(short, long)]
        backup: Option<String>,
    },

    /// Delete files older than a given age
    Purge {
        dir: PathBuf,

        /// Age such as 30m, 12h, 2d or 1w
        #[arg(short = 'a', long = "older-than")]
        older_than: String,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Only report what would be removed
        #[arg(long)]
        dry_run: bool,
    },

    /// Strip the common indentation of a docstring
    Trim {
        /// Read this file instead of stdin
        file: Option<PathBuf>,
    },
}
