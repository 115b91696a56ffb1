// tests/common/mod.rs

//! Shared helpers for driving commands against a real `Db`.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use bytes::Bytes;
use zircondb::core::commands::command_trait::CommandExt;
use zircondb::core::storage::data_types::{DataValue, StoredValue};
use zircondb::core::storage::db::{Db, ExecutionContext};
use zircondb::core::{Command, RespValue, ZirconError};

/// Parses and executes one command line against the database.
pub async fn run(db: &Db, parts: &[&str]) -> Result<RespValue, ZirconError> {
    let tokens: Vec<Bytes> = parts
        .iter()
        .map(|s| Bytes::copy_from_slice(s.as_bytes()))
        .collect();
    let command = Command::parse(&tokens)?;
    let mut ctx = ExecutionContext::lock_for_command(db, command.clone()).await;
    let (reply, _) = command.execute(&mut ctx).await?;
    Ok(reply)
}

/// Executes a command that is expected to succeed.
pub async fn ok(db: &Db, parts: &[&str]) -> RespValue {
    run(db, parts).await.expect("command should succeed")
}

pub fn bulk(s: &str) -> RespValue {
    RespValue::BulkString(Bytes::copy_from_slice(s.as_bytes()))
}

/// A flat array of bulk strings, the shape of most range replies.
pub fn flat(values: &[&str]) -> RespValue {
    RespValue::Array(values.iter().map(|v| bulk(v)).collect())
}

/// Plants a plain string value at a key, bypassing the command layer, so
/// tests can exercise WRONGTYPE handling.
pub async fn seed_string_key(db: &Db, key: &str) {
    let key = Bytes::copy_from_slice(key.as_bytes());
    let shard_index = db.get_shard_index(&key);
    let mut guard = db.get_shard(shard_index).entries.lock().await;
    guard.put(
        key,
        StoredValue::new(DataValue::String(Bytes::from_static(b"not-a-zset"))),
    );
}
