// src/core/commands/command_trait.rs

//! Defines the core traits for all executable commands.

use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bitflags::bitflags;
use bytes::Bytes;

bitflags! {
    /// Flags that describe the properties and behavior of a command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CommandFlags: u32 {
        /// The command modifies the dataset.
        const WRITE         = 1 << 0;
        /// The command only reads data.
        const READONLY      = 1 << 1;
        /// The command is denied once used memory exceeds the ceiling.
        const DENY_OOM      = 1 << 2;
        /// The command runs in constant or near-constant time.
        const FAST          = 1 << 3;
        /// The command names a variable number of keys (`numkeys`-shaped).
        const VARIADIC_KEYS = 1 << 4;
    }
}

/// The outcome of a write operation, used to update dirty-key accounting
/// and to decide whether downstream propagation is necessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The command did not modify any data.
    DidNotWrite,
    /// The command modified one or more keys.
    Write { keys_modified: u64 },
    /// The command deleted one or more keys.
    Delete { keys_deleted: u64 },
}

impl WriteOutcome {
    /// Merges two outcomes, prioritizing the more impactful one.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Delete { keys_deleted: k1 }, Self::Delete { keys_deleted: k2 }) => {
                Self::Delete {
                    keys_deleted: k1 + k2,
                }
            }
            (Self::Delete { keys_deleted: k1 }, Self::Write { keys_modified: k2 })
            | (Self::Write { keys_modified: k2 }, Self::Delete { keys_deleted: k1 }) => {
                Self::Delete {
                    keys_deleted: k1 + k2,
                }
            }
            (Self::Delete { keys_deleted }, Self::DidNotWrite)
            | (Self::DidNotWrite, Self::Delete { keys_deleted }) => Self::Delete { keys_deleted },
            (Self::Write { keys_modified: k1 }, Self::Write { keys_modified: k2 }) => Self::Write {
                keys_modified: k1 + k2,
            },
            (Self::Write { keys_modified }, Self::DidNotWrite)
            | (Self::DidNotWrite, Self::Write { keys_modified }) => Self::Write { keys_modified },
            (Self::DidNotWrite, Self::DidNotWrite) => Self::DidNotWrite,
        }
    }
}

/// A composite trait implemented on the main `Command` enum.
#[async_trait]
pub trait CommandExt {
    /// Returns the flags for the command.
    fn get_flags(&self) -> CommandFlags;
    /// Extracts the keys the command operates on.
    fn get_keys(&self) -> Vec<Bytes>;

    /// Executes the command within a given `ExecutionContext`.
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError>;
}

/// The execution logic of a single command struct.
#[async_trait]
pub trait ExecutableCommand {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError>;
}

/// Parsing of a command's arguments from pre-tokenized byte strings. The
/// slice excludes the command name itself.
pub trait ParseCommand: Sized {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError>;
}
