//! In-memory host implementation
//!
//! A minimal command table and sender pair for embedding the engine without a
//! full host, for the `aliasctl` shell and for tests.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::error::{AliasError, Result};
use crate::host::{CommandSender, HostCommand, HostDispatcher};
use crate::types::{CommandOutcome, InvocationArg};

/// Command table with case-insensitive names, kept in registration order
///
/// Invocations are not excluded while a reload swaps aliases. An alias invoked
/// after the old commands are unregistered and before the new ones are registered
/// fails with "Unknown command".
#[derive(Default)]
pub struct InMemoryDispatcher {
    commands: RwLock<Vec<Arc<dyn HostCommand>>>,
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a command by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn HostCommand>> {
        self.commands
            .read()
            .iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered command names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.commands
            .read()
            .iter()
            .map(|cmd| cmd.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    /// Parse a raw input line and run it as `sender`
    pub fn execute_line(&self, sender: &dyn CommandSender, line: &str) -> Result<CommandOutcome> {
        let mut tokens = tokenize(line).into_iter();
        let name = tokens
            .next()
            .ok_or_else(|| AliasError::Dispatch("Empty command line".to_string()))?;
        let args: Vec<InvocationArg> = tokens.collect();

        // The table lock is released before executing; commands may re-enter the dispatcher.
        let command = self
            .get(&name.raw)
            .ok_or_else(|| AliasError::Dispatch(format!("Unknown command: {}", name.raw)))?;

        if !command.allowed_source().permits(sender.is_console()) {
            return Ok(CommandOutcome::Error(format!(
                "'{}' cannot be used from this source",
                command.name()
            )));
        }

        debug!(command = %command.name(), sender = %sender.display_name(), "Executing command");
        command.execute(sender, &args)
    }
}

impl HostDispatcher for InMemoryDispatcher {
    fn register(&self, command: Arc<dyn HostCommand>) -> Result<()> {
        let mut commands = self.commands.write();
        if commands
            .iter()
            .any(|cmd| cmd.name().eq_ignore_ascii_case(command.name()))
        {
            return Err(AliasError::HostRegistration(format!(
                "Command already registered: {}",
                command.name()
            )));
        }
        commands.push(command);
        Ok(())
    }

    fn unregister(&self, name: &str) -> Result<()> {
        let mut commands = self.commands.write();
        let position = commands
            .iter()
            .position(|cmd| cmd.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                AliasError::HostRegistration(format!("Command not registered: {}", name))
            })?;
        commands.remove(position);
        Ok(())
    }
}

/// Split a raw command line into typed tokens
///
/// Whitespace separates tokens. Double quotes group a token and mark it as a string.
/// Unquoted numbers and booleans are non-string; any other word is a string.
pub fn tokenize(line: &str) -> Vec<InvocationArg> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(classify(std::mem::take(&mut current), quoted));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        tokens.push(classify(current, quoted));
    }

    tokens
}

fn classify(raw: String, quoted: bool) -> InvocationArg {
    if quoted {
        return InvocationArg::new(raw, true);
    }
    let numeric = raw.parse::<i64>().is_ok()
        || (raw.parse::<f64>().is_ok() && raw.chars().any(|c| c.is_ascii_digit()));
    let boolean = matches!(raw.as_str(), "true" | "false");
    let is_string = !(numeric || boolean);
    InvocationArg::new(raw, is_string)
}

/// Sender that records everything dispatched to it
pub struct RecordingSender {
    name: String,
    console: bool,
    reject: bool,
    dispatched: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingSender {
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            console: false,
            reject: false,
            dispatched: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn console() -> Self {
        Self {
            console: true,
            ..Self::player("Console")
        }
    }

    /// A sender whose every dispatch fails
    pub fn rejecting(name: impl Into<String>) -> Self {
        Self {
            reject: true,
            ..Self::player(name)
        }
    }

    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl CommandSender for RecordingSender {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_console(&self) -> bool {
        self.console
    }

    fn dispatch_command(&self, command: &str) -> Result<()> {
        if self.reject {
            return Err(AliasError::Dispatch(format!("Rejected: {}", command)));
        }
        self.dispatched.lock().push(command.to_string());
        Ok(())
    }

    fn send_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
