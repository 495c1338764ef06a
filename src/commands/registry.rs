use super::ChatState;
use super::handler::{
    ClearCommand, CommandHandler, HelpCommand, ModelCommand, QuitCommand, SaveHistoryCommand,
};
use crate::core::error::PxError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Slash commands by name; cheap to clone into the line editor's completer
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: CommandHandler + 'static>(&mut self, name: &str, command: C) {
        self.handlers.insert(name.to_string(), Arc::new(command));
    }

    pub fn execute(
        &self,
        name: &str,
        args: &[&str],
        state: &mut ChatState,
    ) -> Result<Option<String>, PxError> {
        self.handlers
            .get(name)
            .ok_or_else(|| PxError::Input(format!("Unknown command: /{}, try /help", name)))
            .and_then(|handler| handler.execute(state, args))
    }

    /// Sorted command names
    pub fn get_command_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}

pub fn create_command_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("clear", ClearCommand);
    registry.register("model", ModelCommand);
    registry.register("save", SaveHistoryCommand);

    registry
}
