pub mod handler;
pub mod registry;

use crate::chat::ChatApi;
use std::path::PathBuf;

pub use registry::{CommandRegistry, create_command_registry};

/// What slash commands can see and change during a chat session
pub struct ChatState {
    pub api: ChatApi,
    pub history_dir: PathBuf,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(api: ChatApi, history_dir: PathBuf) -> Self {
        Self {
            api,
            history_dir,
            should_continue: true,
        }
    }
}

/// Split `/name arg1 arg2` into the command name and its arguments.
/// Returns `None` for lines that are not slash commands.
pub fn parse_slash_command(line: &str) -> Option<(&str, Vec<&str>)> {
    let rest = line.trim().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next()?;
    Some((name, parts.collect()))
}
