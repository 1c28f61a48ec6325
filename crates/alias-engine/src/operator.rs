//! Operator command that reloads aliases from their source

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::host::{CommandSender, HostCommand};
use crate::registry::AliasRegistry;
use crate::source::DefinitionSource;
use crate::types::{CommandOutcome, InvocationArg};

/// `reloadaliases`: swap in a fresh generation, or keep the current one on failure
pub struct ReloadAliasesCommand {
    name: String,
    permission: String,
    registry: Arc<AliasRegistry>,
    source: Arc<dyn DefinitionSource>,
}

impl ReloadAliasesCommand {
    pub fn new(
        name: impl Into<String>,
        permission: impl Into<String>,
        registry: Arc<AliasRegistry>,
        source: Arc<dyn DefinitionSource>,
    ) -> Self {
        Self {
            name: name.into(),
            permission: permission.into(),
            registry,
            source,
        }
    }
}

impl HostCommand for ReloadAliasesCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Reload aliases")
    }

    fn permission(&self) -> &str {
        &self.permission
    }

    fn execute(
        &self,
        sender: &dyn CommandSender,
        _args: &[InvocationArg],
    ) -> Result<CommandOutcome> {
        sender.send_message("Reloading aliases...");

        match self.registry.reload(self.source.as_ref()) {
            Ok(report) => {
                debug!(
                    generation = report.generation,
                    loaded = report.loaded,
                    "Reload command done"
                );
                sender.send_message("Successfully reloaded!");
                Ok(CommandOutcome::Success)
            }
            Err(e) => Ok(CommandOutcome::Error(format!("Error found: {}", e))),
        }
    }
}
