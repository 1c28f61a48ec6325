// Shell host: senders and built-in commands for aliasctl

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use alias_engine::memory::tokenize;
use alias_engine::{
    AliasError, AliasRegistry, CommandOutcome, CommandSender, HostCommand, HostDispatcher,
    InMemoryDispatcher, InvocationArg, Result,
};
use colored::Colorize;

/// Deepest alias-inside-alias chain a single input line may trigger
pub const MAX_DEPTH: usize = 16;

/// A player or the console, running lines against the in-memory host
pub struct ShellSender {
    name: String,
    console: bool,
    dispatcher: Weak<InMemoryDispatcher>,
    depth: Arc<AtomicUsize>,
}

impl ShellSender {
    pub fn new(
        name: impl Into<String>,
        console: bool,
        dispatcher: &Arc<InMemoryDispatcher>,
        depth: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            name: name.into(),
            console,
            dispatcher: Arc::downgrade(dispatcher),
            depth,
        }
    }

    /// Run one command line and report its outcome to this sender
    ///
    /// An unknown command is reported to the sender and is not an error, so the
    /// remaining templates of an alias still run. Exceeding [`MAX_DEPTH`] is an error.
    pub fn run(&self, line: &str) -> Result<()> {
        let dispatcher = self
            .dispatcher
            .upgrade()
            .ok_or_else(|| AliasError::Dispatch("Host is shut down".to_string()))?;

        let Some(name) = tokenize(line).into_iter().next().map(|token| token.raw) else {
            return Ok(());
        };
        if !dispatcher.contains(&name) {
            self.send_message(&format!("Unknown command: {}", name).red().to_string());
            return Ok(());
        }

        if self.depth.fetch_add(1, Ordering::SeqCst) >= MAX_DEPTH {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(AliasError::Dispatch(format!(
                "Command nesting deeper than {}: {}",
                MAX_DEPTH, line
            )));
        }
        let result = dispatcher.execute_line(self, line);
        self.depth.fetch_sub(1, Ordering::SeqCst);

        match result? {
            CommandOutcome::Success => {}
            CommandOutcome::ShowUsage => {
                let usage = dispatcher
                    .get(&name)
                    .and_then(|cmd| cmd.usage().map(str::to_string))
                    .unwrap_or_default();
                let usage_line = format!("Usage: /{} {}", name, usage);
                self.send_message(&usage_line.trim_end().yellow().to_string());
            }
            CommandOutcome::Error(msg) => self.send_message(&msg.red().to_string()),
        }
        Ok(())
    }
}

impl CommandSender for ShellSender {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_console(&self) -> bool {
        self.console
    }

    fn dispatch_command(&self, command: &str) -> Result<()> {
        self.run(command)
    }

    fn send_message(&self, message: &str) {
        if self.console {
            println!("{} {}", "[console]".dimmed(), message);
        } else {
            println!("{} {}", format!("[{}]", self.name).dimmed(), message);
        }
    }
}

fn joined(args: &[InvocationArg]) -> String {
    args.iter()
        .map(|arg| arg.raw.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `broadcast <text...>`
struct Broadcast;

impl HostCommand for Broadcast {
    fn name(&self) -> &str {
        "broadcast"
    }

    fn usage(&self) -> Option<&str> {
        Some("<text...>")
    }

    fn permission(&self) -> &str {
        "shell.broadcast"
    }

    fn execute(
        &self,
        _sender: &dyn CommandSender,
        args: &[InvocationArg],
    ) -> Result<CommandOutcome> {
        if args.is_empty() {
            return Ok(CommandOutcome::ShowUsage);
        }
        println!("{} {}", "[Broadcast]".bold(), joined(args));
        Ok(CommandOutcome::Success)
    }
}

/// `say <text...>`
struct Say;

impl HostCommand for Say {
    fn name(&self) -> &str {
        "say"
    }

    fn usage(&self) -> Option<&str> {
        Some("<text...>")
    }

    fn permission(&self) -> &str {
        "shell.say"
    }

    fn execute(
        &self,
        sender: &dyn CommandSender,
        args: &[InvocationArg],
    ) -> Result<CommandOutcome> {
        println!("<{}> {}", sender.display_name(), joined(args));
        Ok(CommandOutcome::Success)
    }
}

/// `aliases`: list the active generation
struct ListAliases {
    registry: Weak<AliasRegistry>,
}

impl HostCommand for ListAliases {
    fn name(&self) -> &str {
        "aliases"
    }

    fn description(&self) -> Option<&str> {
        Some("List active aliases")
    }

    fn permission(&self) -> &str {
        "shell.aliases"
    }

    fn execute(
        &self,
        sender: &dyn CommandSender,
        _args: &[InvocationArg],
    ) -> Result<CommandOutcome> {
        let Some(registry) = self.registry.upgrade() else {
            return Ok(CommandOutcome::Error("Aliases are not loaded".to_string()));
        };

        let generation = registry.snapshot();
        sender.send_message(&format!(
            "Generation {} loaded at {} ({} aliases)",
            generation.id(),
            generation.loaded_at().format("%Y-%m-%d %H:%M:%S"),
            generation.len()
        ));
        for alias in generation.aliases() {
            let description = alias.description().unwrap_or("");
            sender.send_message(&format!("  {} - {}", alias.name().bold(), description));
        }
        Ok(CommandOutcome::Success)
    }
}

/// Register the shell's built-in commands
pub fn register_builtins(
    dispatcher: &InMemoryDispatcher,
    registry: &Arc<AliasRegistry>,
) -> Result<()> {
    dispatcher.register(Arc::new(Broadcast))?;
    dispatcher.register(Arc::new(Say))?;
    dispatcher.register(Arc::new(ListAliases {
        registry: Arc::downgrade(registry),
    }))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alias_engine::{AliasesConfig, InlineSource};
    use parking_lot::Mutex;

    /// `rec <text...>`: records "<sender>: <text>" for each run
    struct Rec {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl HostCommand for Rec {
        fn name(&self) -> &str {
            "rec"
        }

        fn permission(&self) -> &str {
            "shell.rec"
        }

        fn execute(
            &self,
            sender: &dyn CommandSender,
            args: &[InvocationArg],
        ) -> Result<CommandOutcome> {
            self.log
                .lock()
                .push(format!("{}: {}", sender.display_name(), joined(args)));
            Ok(CommandOutcome::Success)
        }
    }

    #[allow(clippy::type_complexity)]
    fn recording_shell(
        json: &str,
    ) -> (
        Arc<InMemoryDispatcher>,
        Arc<AliasRegistry>,
        Arc<Mutex<Vec<String>>>,
        ShellSender,
    ) {
        let (dispatcher, registry, player) = shell(json);
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.register(Arc::new(Rec { log: log.clone() })).unwrap();
        (dispatcher, registry, log, player)
    }

    fn shell(json: &str) -> (Arc<InMemoryDispatcher>, Arc<AliasRegistry>, ShellSender) {
        let dispatcher = Arc::new(InMemoryDispatcher::new());
        let depth = Arc::new(AtomicUsize::new(0));
        let console: Arc<dyn CommandSender> =
            Arc::new(ShellSender::new("Console", true, &dispatcher, depth.clone()));
        let registry = Arc::new(AliasRegistry::new(
            dispatcher.clone(),
            console,
            &AliasesConfig::default(),
        ));
        register_builtins(&dispatcher, &registry).unwrap();
        registry
            .activate(registry.load(&InlineSource::json(json)).unwrap())
            .unwrap();
        let player = ShellSender::new("Steve", false, &dispatcher, depth);
        (dispatcher, registry, player)
    }

    #[test]
    fn test_builtins_registered() {
        let (dispatcher, _registry, _) = shell("[]");
        assert_eq!(dispatcher.names(), vec!["broadcast", "say", "aliases"]);
    }

    #[test]
    fn test_alias_expands_and_routes_to_senders() {
        let (_dispatcher, _registry, log, player) = recording_shell(
            r#"[{"name": "hi", "commands": ["rec hi from $sender", "console:rec done"]}]"#,
        );

        player.run("hi").unwrap();

        assert_eq!(*log.lock(), vec!["Steve: hi from Steve", "Console: done"]);
    }

    #[test]
    fn test_failed_template_does_not_stop_later_ones() {
        let (_dispatcher, _registry, log, player) = recording_shell(
            r#"[{"name": "multi", "commands": ["rec first", "typo", "rec third"]}]"#,
        );

        player.run("multi").unwrap();

        assert_eq!(*log.lock(), vec!["Steve: first", "Steve: third"]);
    }

    #[test]
    fn test_list_aliases_runs() {
        let (_dispatcher, _registry, player) =
            shell(r#"[{"name": "hi", "commands": ["say hi"]}]"#);
        player.run("aliases").unwrap();
    }

    #[test]
    fn test_recursive_alias_is_capped() {
        let (_dispatcher, _registry, player) =
            shell(r#"[{"name": "loop", "commands": ["loop"]}]"#);

        let err = player.run("loop").unwrap_err();

        assert!(matches!(err, AliasError::Dispatch(_)));
        assert!(err.to_string().contains("nesting"));
        // the counter is fully unwound afterwards
        player.run("say still alive").unwrap();
    }

    #[test]
    fn test_unknown_command() {
        let (_dispatcher, _registry, player) = shell("[]");
        assert!(player.run("nope").is_ok());
    }

    #[test]
    fn test_show_usage_is_not_an_error() {
        let (_dispatcher, _registry, player) = shell("[]");
        player.run("broadcast").unwrap();
    }
}
