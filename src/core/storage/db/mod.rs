// src/core/storage/db/mod.rs

//! The sharded keyspace: `Db` splits keys across `NUM_SHARDS` independent
//! shards, each guarded by its own mutex. Commands acquire the locks they
//! need up front through `ExecutionLocks` and carry them in an
//! `ExecutionContext`.

pub mod context;
pub mod core;
pub mod locking;
pub mod shard;

pub use context::ExecutionContext;
pub use core::{Db, NUM_SHARDS};
pub use locking::ExecutionLocks;
pub use shard::{DbShard, ShardCache};
