use regex::{Captures, Regex};

use crate::error::Result;
use crate::types::InvocationArg;

/// Matches `$sender`, `$arg*` and `$arg<index>`
const TOKEN_PATTERN: &str = r"\$(?:sender|arg(\*|\d+))";

/// Default prefix that sends an expanded command to the console executor
pub const CONSOLE_PREFIX: &str = "console:";

/// Where an expanded command should be dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTarget<'a> {
    /// Privileged console executor, prefix already stripped
    Console(&'a str),
    /// The sender that invoked the alias
    Sender(&'a str),
}

/// Template processor for alias command expansion
pub struct TemplateProcessor;

impl TemplateProcessor {
    /// Expand a command template for one invocation
    ///
    /// Supports the following tokens:
    /// - `$sender` - the invoking sender's display name
    /// - `$arg0`, `$arg1`, ... - the raw text of that positional argument
    /// - `$arg*` - every argument joined by a space, string arguments double-quoted
    ///
    /// All tokens are matched against the literal template in a single pass, so text
    /// coming from a substitution is never scanned again. A `$argN` token with no
    /// matching argument is left in place.
    ///
    /// `$argN` takes the longest run of digits, so with two arguments `$arg10` refers
    /// to argument 10 and stays literal. Replacing `$arg1` as a plain prefix would
    /// instead produce the first argument followed by `0`.
    pub fn expand(template: &str, sender_name: &str, args: &[InvocationArg]) -> Result<String> {
        let pattern = Regex::new(TOKEN_PATTERN)?;

        let aggregate = if template.contains("$arg*") {
            Self::join_args(args)
        } else {
            String::new()
        };

        let expanded = pattern.replace_all(template, |caps: &Captures| {
            match caps.get(1).map(|m| m.as_str()) {
                None => sender_name.to_string(),
                Some("*") => aggregate.clone(),
                Some(index) => index
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| args.get(i))
                    .map(|arg| arg.raw.clone())
                    .unwrap_or_else(|| caps[0].to_string()),
            }
        });

        Ok(expanded.into_owned())
    }

    /// Join all arguments the way `$arg*` renders them
    pub fn join_args(args: &[InvocationArg]) -> String {
        args.iter()
            .map(|arg| {
                if arg.is_string {
                    format!("\"{}\"", arg.raw)
                } else {
                    arg.raw.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Positional argument indices referenced by a template, in order of first use
    pub fn referenced_indices(template: &str) -> Result<Vec<usize>> {
        let pattern = Regex::new(TOKEN_PATTERN)?;
        let mut indices = Vec::new();

        for cap in pattern.captures_iter(template) {
            let Some(index) = cap.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) else {
                continue;
            };
            if !indices.contains(&index) {
                indices.push(index);
            }
        }

        Ok(indices)
    }

    /// Decide the dispatch target of an expanded command
    pub fn route<'a>(expanded: &'a str, console_prefix: &str) -> DispatchTarget<'a> {
        match expanded.strip_prefix(console_prefix) {
            Some(rest) if !console_prefix.is_empty() => DispatchTarget::Console(rest),
            _ => DispatchTarget::Sender(expanded),
        }
    }
}
