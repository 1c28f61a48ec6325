//! Alias module lifecycle: bootstrap, startup activation, reload command, shutdown

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::AliasesConfig;
use crate::error::Result;
use crate::host::{CommandSender, HostDispatcher};
use crate::operator::ReloadAliasesCommand;
use crate::registry::AliasRegistry;
use crate::source::{DefinitionSource, FileSource};

/// Ties the registry, its file source and the reload command to one host
pub struct AliasesModule {
    config: AliasesConfig,
    dispatcher: Arc<dyn HostDispatcher>,
    registry: Arc<AliasRegistry>,
    source: Arc<FileSource>,
}

impl AliasesModule {
    pub fn new(
        config: AliasesConfig,
        dispatcher: Arc<dyn HostDispatcher>,
        console: Arc<dyn CommandSender>,
    ) -> Self {
        let registry = Arc::new(AliasRegistry::new(dispatcher.clone(), console, &config));
        let source = Arc::new(FileSource::new(config.aliases_file.clone()));
        Self {
            config,
            dispatcher,
            registry,
            source,
        }
    }

    /// Start the module
    ///
    /// A broken alias file does not fail startup: the error is logged and the
    /// operator can fix the file and run the reload command. Only a failure to
    /// register the reload command itself is returned.
    pub fn enable(&self) -> Result<()> {
        info!(path = %self.source.describe(), "Enabling aliases");

        if self.config.write_defaults {
            if let Err(e) = self.source.ensure_default() {
                warn!(error = %e, "Could not write default aliases");
            }
        }

        let activated = self
            .registry
            .load(self.source.as_ref())
            .and_then(|generation| self.registry.activate(generation));
        match activated {
            Ok(failures) if failures.is_empty() => {}
            Ok(failures) => {
                warn!(failed = failures.len(), "Some aliases could not be registered");
            }
            Err(e) => {
                error!("An error occurred while loading aliases.");
                error!(
                    "Make sure that {} is in the correct format,",
                    self.source.describe()
                );
                error!("then use '/{}' to try again.", self.config.reload_command);
                error!(error = %e, kind = e.kind(), "Alias load failed");
            }
        }

        let source: Arc<dyn DefinitionSource> = self.source.clone();
        self.dispatcher.register(Arc::new(ReloadAliasesCommand::new(
            self.config.reload_command.clone(),
            self.config.reload_permission.clone(),
            self.registry.clone(),
            source,
        )))?;

        Ok(())
    }

    /// Stop the module, unregistering the reload command and every alias
    pub fn disable(&self) -> Result<()> {
        info!("Disabling aliases");
        let reload = self.dispatcher.unregister(&self.config.reload_command);
        let aliases = self.registry.shutdown();
        reload.and(aliases)
    }

    pub fn registry(&self) -> &Arc<AliasRegistry> {
        &self.registry
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn config(&self) -> &AliasesConfig {
        &self.config
    }
}
