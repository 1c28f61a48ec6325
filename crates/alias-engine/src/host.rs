//! Collaborator traits for the host command system
//!
//! The alias engine does not parse input, check permissions or run commands itself.
//! It talks to the host through these traits, which are handed to it at construction
//! time rather than looked up from global state.

use std::sync::Arc;

use crate::error::Result;
use crate::types::{AllowedSource, CommandOutcome, InvocationArg};

/// Anything that can invoke a command: a player, the console, a test double
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the console sender is shared by every
/// registered alias.
pub trait CommandSender: Send + Sync {
    /// Name substituted for `$sender`
    fn display_name(&self) -> &str;

    /// Whether this sender is the console channel
    fn is_console(&self) -> bool {
        false
    }

    /// Run a raw command line as this sender
    fn dispatch_command(&self, command: &str) -> Result<()>;

    /// Show a message to this sender
    fn send_message(&self, message: &str);
}

/// A named, invocable command owned by the host dispatcher
pub trait HostCommand: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    fn usage(&self) -> Option<&str> {
        None
    }

    /// Permission the host checks before calling [`HostCommand::execute`]
    fn permission(&self) -> &str;

    fn allowed_source(&self) -> AllowedSource {
        AllowedSource::Both
    }

    fn execute(&self, sender: &dyn CommandSender, args: &[InvocationArg]) -> Result<CommandOutcome>;
}

/// The host's command registration table
///
/// Names are unique per dispatcher; registering a taken name or unregistering a
/// missing one is an [`crate::AliasError::HostRegistration`].
pub trait HostDispatcher: Send + Sync {
    fn register(&self, command: Arc<dyn HostCommand>) -> Result<()>;

    fn unregister(&self, name: &str) -> Result<()>;
}
