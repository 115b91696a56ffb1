// src/core/commands/command_spec.rs

//! Defines the `CommandSpec` trait, which provides metadata about a command.
//! This is what a router or an introspection command reads.

use crate::core::commands::command_trait::CommandFlags;
use bytes::Bytes;

/// A trait describing a command's wire-level properties.
pub trait CommandSpec {
    /// The name of the command in lowercase.
    fn name(&self) -> &'static str;

    /// The arity of the command, counting the command name itself.
    /// - Positive: exact number of arguments.
    /// - Negative: minimum number of arguments.
    fn arity(&self) -> i64;

    /// A bitmask of flags describing the command's behavior.
    fn flags(&self) -> CommandFlags;

    /// Extracts the key(s) from a parsed command instance.
    fn get_keys(&self) -> Vec<Bytes>;
}
