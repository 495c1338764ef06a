use crate::chat::ChatApi;
use crate::cli::{Args, Command};
use crate::commands::{ChatState, create_command_registry, parse_slash_command};
use crate::config::Config;
use crate::core::error::PxError;
use crate::display;
use crate::input;
use crate::tools::{looper, modlist, onefile, purge, runc};
use crate::utils::{duration, files, grep, text};
use is_terminal::IsTerminal;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const QUICK_SUFFIX: &str = "\nShort answer pls.";

pub struct Application {
    pub args: Args,
    pub config: Config,
}

impl Application {
    pub fn new(args: Args, config: Config) -> Self {
        Self { args, config }
    }

    /// Run the selected subcommand and return the process exit code.
    pub async fn run(&self) -> Result<i32, PxError> {
        match &self.args.command {
            Command::Loop { cmd, interval, count } => {
                let options = looper::LoopOptions {
                    command: cmd.clone(),
                    interval: looper::interval_from_secs(*interval)?,
                    count: *count,
                };
                let summary = looper::run_loop(&options).await?;
                if summary.interrupted {
                    println!();
                    display::display_success(&format!("stopped after {} runs", summary.runs));
                }
                Ok(0)
            }
            Command::Chat { model, quick } => {
                self.handle_chat(model.as_deref(), *quick).await?;
                Ok(0)
            }
            Command::Runc { file, level } => runc::compile_and_run(file, level),
            Command::LsMod { target } => {
                let listing = modlist::list_module_contents(target)?;
                print!("{}", listing);
                Ok(0)
            }
            Command::Onefile { spec, output, tldr } => {
                if *tldr {
                    display::display_markdown(onefile::TLDR);
                    return Ok(0);
                }
                let options = onefile::OneFileOptions {
                    root: PathBuf::from("."),
                    spec: spec.clone(),
                    output: output.clone(),
                };
                let report = onefile::combine_files(&options)?;
                println!("one file is generated at {}", report.output.display());
                Ok(0)
            }
            Command::Grep { pattern, file } => {
                let lines = match file {
                    Some(path) => grep::grep(pattern, grep::GrepSource::File(path))?,
                    None => grep::grep(pattern, grep::GrepSource::Text(&read_stdin()?))?,
                };
                for line in &lines {
                    println!("{}", line);
                }
                Ok(if lines.is_empty() { 1 } else { 0 })
            }
            Command::Replace { file, old, new, backup } => {
                let count = files::replace_in_file(file, old, new, backup.as_deref())?;
                display::display_success(&format!(
                    "{} replacement(s) in {}",
                    count,
                    file.display()
                ));
                Ok(0)
            }
            Command::Purge { dir, older_than, recursive, dry_run } => {
                self.handle_purge(dir, older_than, *recursive, *dry_run)
            }
            Command::Trim { file } => {
                let input = match file {
                    Some(path) => std::fs::read_to_string(path)?,
                    None => read_stdin()?,
                };
                println!("{}", text::trim_docstring(&input));
                Ok(0)
            }
        }
    }

    fn handle_purge(
        &self,
        dir: &Path,
        older_than: &str,
        recursive: bool,
        dry_run: bool,
    ) -> Result<i32, PxError> {
        let max_age = duration::parse_duration(older_than)?;
        let options = purge::PurgeOptions { recursive, dry_run };
        let report = purge::purge_older_than(dir, max_age, options)?;

        let verb = if report.dry_run { "would remove" } else { "removed" };
        for path in &report.removed {
            println!("{} {}", verb, path.display());
        }
        display::display_success(&format!(
            "{} {} file(s) older than {}, kept {}",
            verb,
            report.removed.len(),
            duration::format_duration(max_age),
            report.kept
        ));
        if report.errors > 0 {
            println!("skipped {} unreadable or locked entr(ies)", report.errors);
            return Ok(1);
        }
        Ok(0)
    }

    async fn handle_chat(&self, model: Option<&str>, quick: bool) -> Result<(), PxError> {
        let api = ChatApi::from_config(&self.config, model)?;
        let mut state = ChatState::new(api, Config::history_dir());

        // Piped input: every line is one question, no editor
        if !io::stdin().is_terminal() {
            let input = read_stdin()?;
            for question in piped_questions(&input) {
                ask(&mut state, question, quick).await;
            }
            return Ok(());
        }

        let registry = create_command_registry();
        let mut editor = input::create_editor(registry.clone())?;
        display::display_chat_welcome(state.api.model());
        info!(model = state.api.model(), "chat session started");

        loop {
            let Some(line) = input::read_input(&mut editor)? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if is_quit(line) {
                break;
            }

            if let Some((name, args)) = parse_slash_command(line) {
                match registry.execute(name, &args, &mut state) {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) => display::display_error(&e),
                }
                if !state.should_continue {
                    break;
                }
                continue;
            }

            ask(&mut state, line, quick).await;
        }

        if let Err(e) = input::save_history(&mut editor) {
            warn!(error = %e, "could not save input history");
        }
        Ok(())
    }
}

fn is_quit(line: &str) -> bool {
    line == "q" || line == "quit"
}

/// Non-blank piped lines up to the first `q`/`quit`
fn piped_questions(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .take_while(|q| !is_quit(q))
        .collect()
}

/// A failed question is reported and the session goes on
async fn ask(state: &mut ChatState, question: &str, quick: bool) {
    let question = if quick {
        format!("{}{}", question, QUICK_SUFFIX)
    } else {
        question.to_string()
    };
    match state.api.chat(&question).await {
        Ok(answer) => display::display_answer(&answer),
        Err(e) => display::display_error(&e),
    }
}

fn read_stdin() -> Result<String, PxError> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| PxError::Input(format!("Failed to read from stdin: {}", e)))?;
    Ok(buffer)
}
