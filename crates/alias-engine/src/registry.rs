//! Alias registry: loading generations and swapping them into the host
//!
//! A generation is an immutable, complete set of aliases. Loading builds a new
//! generation without touching anything live; activation and reload then publish it
//! through an atomic pointer swap, so readers never observe a half-built set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::alias::AliasCommand;
use crate::config::AliasesConfig;
use crate::error::{AliasError, Result};
use crate::host::{CommandSender, HostCommand, HostDispatcher};
use crate::source::DefinitionSource;
use crate::types::AliasDefinition;

/// One complete, internally consistent set of aliases
#[derive(Debug, Clone)]
pub struct Generation {
    id: u64,
    loaded_at: DateTime<Utc>,
    aliases: Vec<Arc<AliasDefinition>>,
}

impl Generation {
    fn new(id: u64, aliases: Vec<Arc<AliasDefinition>>) -> Self {
        Self {
            id,
            loaded_at: Utc::now(),
            aliases,
        }
    }

    /// The empty generation a registry starts with
    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Aliases in declaration order
    pub fn aliases(&self) -> &[Arc<AliasDefinition>] {
        &self.aliases
    }

    /// Find an alias by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Arc<AliasDefinition>> {
        self.aliases.iter().find(|alias| alias.same_name(name))
    }

    pub fn names(&self) -> Vec<String> {
        self.aliases
            .iter()
            .map(|alias| alias.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Summary of a successful reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadReport {
    /// Id of the generation now active
    pub generation: u64,
    /// Number of aliases unregistered
    pub previous: usize,
    /// Number of aliases registered
    pub loaded: usize,
}

/// Registry of the active alias generation
pub struct AliasRegistry {
    dispatcher: Arc<dyn HostDispatcher>,
    console: Arc<dyn CommandSender>,
    permission_prefix: String,
    console_prefix: String,
    active: ArcSwap<Generation>,
    next_id: AtomicU64,
    /// Serializes activate, reload and shutdown
    swap_lock: Mutex<()>,
}

impl AliasRegistry {
    /// Create an empty registry bound to a host dispatcher and console executor
    pub fn new(
        dispatcher: Arc<dyn HostDispatcher>,
        console: Arc<dyn CommandSender>,
        config: &AliasesConfig,
    ) -> Self {
        Self {
            dispatcher,
            console,
            permission_prefix: config.permission_prefix.clone(),
            console_prefix: config.console_prefix.clone(),
            active: ArcSwap::from_pointee(Generation::empty()),
            next_id: AtomicU64::new(1),
            swap_lock: Mutex::new(()),
        }
    }

    /// Build a pending generation from `source`
    ///
    /// Records are validated in order and the first failure aborts the whole load;
    /// nothing live is modified either way.
    pub fn load(&self, source: &dyn DefinitionSource) -> Result<Generation> {
        let records = source.read_records()?;
        let mut aliases: Vec<Arc<AliasDefinition>> = Vec::with_capacity(records.len());

        for raw in &records {
            let alias = AliasDefinition::from_record(raw, &self.permission_prefix)?;
            if aliases.iter().any(|existing| existing.same_name(alias.name())) {
                return Err(AliasError::DuplicateName(format!(
                    "An alias with name '{}' is already registered. Alias:\n{}",
                    alias.name(),
                    raw
                )));
            }
            aliases.push(Arc::new(alias));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            source = %source.describe(),
            generation = id,
            count = aliases.len(),
            "Loaded aliases"
        );
        Ok(Generation::new(id, aliases))
    }

    /// Register a freshly loaded generation at startup
    ///
    /// Registration is best-effort: an alias the host rejects is logged, left out of
    /// the active generation, and returned in the error list. Fails only when a
    /// generation is already active; use [`AliasRegistry::reload`] then.
    pub fn activate(&self, generation: Generation) -> Result<Vec<AliasError>> {
        let _guard = self.swap_lock.lock();

        if !self.active.load().is_empty() {
            return Err(AliasError::HostRegistration(
                "Aliases are already active; reload instead".to_string(),
            ));
        }

        let mut registered = Vec::with_capacity(generation.len());
        let mut failures = Vec::new();
        for alias in generation.aliases() {
            match self.dispatcher.register(self.host_command(alias)) {
                Ok(()) => {
                    debug!(alias = %alias.name(), "Registered alias");
                    registered.push(alias.clone());
                }
                Err(e) => {
                    error!(alias = %alias.name(), error = %e, "Failed to register alias");
                    failures.push(e);
                }
            }
        }

        let generation = Generation {
            aliases: registered,
            ..generation
        };
        info!(
            generation = generation.id(),
            count = generation.len(),
            failed = failures.len(),
            "Activated aliases"
        );
        self.active.store(Arc::new(generation));
        Ok(failures)
    }

    /// Replace the active generation with one loaded from `source`
    ///
    /// On any failure the previous generation stays active and the host's
    /// registrations are left as they were. Old commands are unregistered before
    /// new ones are registered.
    pub fn reload(&self, source: &dyn DefinitionSource) -> Result<ReloadReport> {
        let _guard = self.swap_lock.lock();
        let previous = self.active.load_full();

        let pending = match self.load(source) {
            Ok(pending) => pending,
            Err(e) => {
                warn!(
                    source = %source.describe(),
                    error = %e,
                    "Reload failed, keeping previous aliases"
                );
                return Err(e);
            }
        };

        if let Err(e) = self.swap_host(&previous, &pending) {
            warn!(error = %e, "Host rejected reload, previous aliases restored");
            return Err(e);
        }

        let report = ReloadReport {
            generation: pending.id(),
            previous: previous.len(),
            loaded: pending.len(),
        };
        self.active.store(Arc::new(pending));
        info!(
            generation = report.generation,
            previous = report.previous,
            loaded = report.loaded,
            "Reloaded aliases"
        );
        Ok(report)
    }

    /// Unregister every active alias and clear the registry
    ///
    /// Keeps going past failures and returns the first one.
    pub fn shutdown(&self) -> Result<()> {
        let _guard = self.swap_lock.lock();
        let previous = self.active.swap(Arc::new(Generation::empty()));

        let mut first_error = None;
        for alias in previous.aliases() {
            if let Err(e) = self.dispatcher.unregister(alias.name()) {
                warn!(alias = %alias.name(), error = %e, "Failed to unregister alias");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// The active generation
    pub fn snapshot(&self) -> Arc<Generation> {
        self.active.load_full()
    }

    /// Find an active alias by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<AliasDefinition>> {
        self.active.load().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.active.load().names()
    }

    pub fn len(&self) -> usize {
        self.active.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.load().is_empty()
    }

    fn host_command(&self, alias: &Arc<AliasDefinition>) -> Arc<dyn HostCommand> {
        Arc::new(AliasCommand::new(
            alias.clone(),
            self.console.clone(),
            self.console_prefix.clone(),
        ))
    }

    /// Move the host from `old` to `new`, undoing partial progress on failure
    fn swap_host(&self, old: &Generation, new: &Generation) -> Result<()> {
        for (i, alias) in old.aliases().iter().enumerate() {
            if let Err(e) = self.dispatcher.unregister(alias.name()) {
                self.reregister(&old.aliases()[..i]);
                return Err(registration_error("unregister", alias.name(), e));
            }
        }

        for (i, alias) in new.aliases().iter().enumerate() {
            if let Err(e) = self.dispatcher.register(self.host_command(alias)) {
                for added in &new.aliases()[..i] {
                    if let Err(undo) = self.dispatcher.unregister(added.name()) {
                        error!(alias = %added.name(), error = %undo, "Failed to undo registration");
                    }
                }
                self.reregister(old.aliases());
                return Err(registration_error("register", alias.name(), e));
            }
        }

        Ok(())
    }

    fn reregister(&self, aliases: &[Arc<AliasDefinition>]) {
        for alias in aliases {
            if let Err(e) = self.dispatcher.register(self.host_command(alias)) {
                error!(alias = %alias.name(), error = %e, "Failed to restore alias");
            }
        }
    }
}

fn registration_error(action: &str, name: &str, cause: AliasError) -> AliasError {
    match cause {
        AliasError::HostRegistration(msg) => {
            AliasError::HostRegistration(format!("{} '{}': {}", action, name, msg))
        }
        other => AliasError::HostRegistration(format!("{} '{}': {}", action, name, other)),
    }
}
