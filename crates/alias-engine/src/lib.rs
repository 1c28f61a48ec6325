//! Dynamic command aliases
//!
//! This crate loads user-defined command shortcuts from a JSON or YAML file, registers
//! each one as a command with a host dispatcher, and expands an alias's command
//! templates when it is invoked. Reloading swaps the whole alias set atomically and
//! rolls back if the new file is invalid.
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//! use alias_engine::{AliasRegistry, AliasesConfig, InlineSource, InMemoryDispatcher, RecordingSender};
//!
//! let dispatcher = Arc::new(InMemoryDispatcher::new());
//! let console = Arc::new(RecordingSender::console());
//! let registry = AliasRegistry::new(dispatcher.clone(), console, &AliasesConfig::default());
//!
//! let source = InlineSource::json(r#"[{"name": "hello", "commands": ["broadcast $sender says $arg0"]}]"#);
//! registry.activate(registry.load(&source)?)?;
//!
//! let steve = RecordingSender::player("Steve");
//! dispatcher.execute_line(&steve, "hello hi")?;
//! assert_eq!(steve.dispatched(), vec!["broadcast Steve says hi"]);
//! ```

pub mod alias;
pub mod config;
pub mod error;
pub mod host;
pub mod memory;
pub mod module;
pub mod operator;
pub mod registry;
pub mod source;
pub mod template;
pub mod types;

pub use alias::AliasCommand;
pub use config::AliasesConfig;
pub use error::{AliasError, Result};
pub use host::{CommandSender, HostCommand, HostDispatcher};
pub use memory::{InMemoryDispatcher, RecordingSender};
pub use module::AliasesModule;
pub use operator::ReloadAliasesCommand;
pub use registry::{AliasRegistry, Generation, ReloadReport};
pub use source::{DefinitionSource, FileSource, InlineSource, SourceFormat};
pub use template::{DispatchTarget, TemplateProcessor};
pub use types::{AliasDefinition, AliasRecord, AllowedSource, CommandOutcome, InvocationArg};
