use super::ChatState;
use crate::core::error::PxError;

use console::style;
use std::path::Path;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, PxError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct ModelCommand;
pub struct SaveHistoryCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, PxError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session (also: q, quit)"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(&self, _state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, PxError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            QuitCommand.help().to_string(),
            HelpCommand.help().to_string(),
            ClearCommand.help().to_string(),
            ModelCommand.help().to_string(),
            SaveHistoryCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, PxError> {
        state.api.clear_history();
        Ok(Some("Chat history cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Forget the conversation so far"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, PxError> {
        match args.first() {
            None => Ok(Some(format!("Current model: {}", state.api.model()))),
            Some(model) => {
                state.api.set_model(model);
                Ok(Some(format!("Model changed to: {}", model)))
            }
        }
    }

    fn help(&self) -> &'static str {
        "/model [name] - Show or change the current model"
    }
}

impl CommandHandler for SaveHistoryCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, PxError> {
        let filename = match args.first() {
            Some(name) => name.to_string(),
            None => chrono::Local::now().format("%Y%m%d_%H%M%S.json").to_string(),
        };
        // Plain file names only; the file always lands in the history directory
        if Path::new(&filename).file_name().and_then(|n| n.to_str()) != Some(filename.as_str()) {
            return Err(PxError::Input(format!("invalid history file name: {}", filename)));
        }

        std::fs::create_dir_all(&state.history_dir)?;
        let path = state.history_dir.join(filename);

        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, state.api.history().messages())?;

        Ok(Some(format!("History saved to: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/save [filename] - Save conversation history as JSON"
    }
}
