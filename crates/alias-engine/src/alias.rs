//! Alias invocation: argument validation, template expansion and redispatch

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::host::{CommandSender, HostCommand};
use crate::template::{DispatchTarget, TemplateProcessor};
use crate::types::{AliasDefinition, AllowedSource, CommandOutcome, InvocationArg};

impl AliasDefinition {
    /// Check positional arguments against the allowed-value sets
    ///
    /// Matching is exact and case-sensitive. A position with no allowed set (`null`)
    /// accepts any value, but the argument still has to be present.
    pub fn accepts(&self, args: &[InvocationArg]) -> bool {
        let Some(valid_inputs) = self.valid_inputs() else {
            return true;
        };

        valid_inputs.iter().enumerate().all(|(i, allowed)| {
            let Some(arg) = args.get(i) else {
                return false;
            };
            match allowed {
                Some(values) => values.iter().any(|value| *value == arg.raw),
                None => true,
            }
        })
    }

    /// Expand every command template for one invocation, in declaration order
    pub fn expand(&self, sender_name: &str, args: &[InvocationArg]) -> Result<Vec<String>> {
        self.commands()
            .iter()
            .map(|template| TemplateProcessor::expand(template, sender_name, args))
            .collect()
    }

    /// Run the alias for `sender`
    ///
    /// Returns [`CommandOutcome::ShowUsage`] without dispatching anything when the
    /// arguments are rejected. Otherwise each expanded command goes to `console` when it
    /// starts with `console_prefix` (prefix stripped), or to `sender` when it does not.
    /// The host's outcome for a sub-command is not inspected; an `Err` from a dispatch
    /// call is returned as-is.
    pub fn execute(
        &self,
        sender: &dyn CommandSender,
        args: &[InvocationArg],
        console: &dyn CommandSender,
        console_prefix: &str,
    ) -> Result<CommandOutcome> {
        if !self.accepts(args) {
            debug!(
                alias = %self.name(),
                arg_count = args.len(),
                "Arguments rejected, showing usage"
            );
            return Ok(CommandOutcome::ShowUsage);
        }

        for template in self.commands() {
            let missing = TemplateProcessor::referenced_indices(template)?
                .into_iter()
                .any(|i| i >= args.len());
            if missing {
                debug!(
                    alias = %self.name(),
                    template = %template,
                    "Template references a missing argument; token left in place"
                );
            }

            let expanded = TemplateProcessor::expand(template, sender.display_name(), args)?;
            match TemplateProcessor::route(&expanded, console_prefix) {
                DispatchTarget::Console(command) => {
                    debug!(alias = %self.name(), command = %command, "Dispatching as console");
                    console.dispatch_command(command)?;
                }
                DispatchTarget::Sender(command) => {
                    sender.dispatch_command(command)?;
                }
            }
        }

        Ok(CommandOutcome::Success)
    }
}

/// Host-facing wrapper that registers one alias as a command
///
/// Holds the console executor it redirects `console:` commands to.
pub struct AliasCommand {
    definition: Arc<AliasDefinition>,
    console: Arc<dyn CommandSender>,
    console_prefix: String,
}

impl AliasCommand {
    pub fn new(
        definition: Arc<AliasDefinition>,
        console: Arc<dyn CommandSender>,
        console_prefix: impl Into<String>,
    ) -> Self {
        Self {
            definition,
            console,
            console_prefix: console_prefix.into(),
        }
    }

    pub fn definition(&self) -> &Arc<AliasDefinition> {
        &self.definition
    }
}

impl HostCommand for AliasCommand {
    fn name(&self) -> &str {
        self.definition.name()
    }

    fn description(&self) -> Option<&str> {
        self.definition.description()
    }

    fn usage(&self) -> Option<&str> {
        self.definition.usage()
    }

    fn permission(&self) -> &str {
        self.definition.permission()
    }

    fn allowed_source(&self) -> AllowedSource {
        self.definition.allowed_source()
    }

    fn execute(
        &self,
        sender: &dyn CommandSender,
        args: &[InvocationArg],
    ) -> Result<CommandOutcome> {
        self.definition
            .execute(sender, args, self.console.as_ref(), &self.console_prefix)
    }
}
