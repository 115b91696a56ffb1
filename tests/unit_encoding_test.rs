// tests/unit_encoding_test.rs

//! Encoding lifecycle: packed→indexed promotion and its boundaries, the
//! transparency of reads across encodings, and the persisted layout.

mod common;

use bytes::Bytes;
use common::{bulk, flat, ok};
use zircondb::config::Config;
use zircondb::core::RespValue;
use zircondb::core::storage::data_types::DataValue;
use zircondb::core::storage::db::Db;
use zircondb::core::storage::zset::SortedSet;

async fn is_packed(db: &Db, key: &str) -> bool {
    let key = Bytes::copy_from_slice(key.as_bytes());
    let shard_index = db.get_shard_index(&key);
    let guard = db.get_shard(shard_index).entries.lock().await;
    let entry = guard.get(&key).expect("key should exist");
    match &entry.data {
        DataValue::SortedSet(zset) => zset.is_packed(),
        _ => panic!("expected a sorted set"),
    }
}

#[tokio::test]
async fn promotion_crosses_at_the_entry_threshold() {
    let db = Db::new();
    for i in 0..128 {
        let score = format!("{i}");
        let member = format!("m{i:03}");
        ok(&db, &["ZADD", "s", &score, &member]).await;
    }
    assert!(is_packed(&db, "s").await);
    ok(&db, &["ZADD", "s", "128", "m128"]).await;
    assert!(!is_packed(&db, "s").await);
    // Shrinking back below the threshold never demotes.
    for i in 0..100 {
        let member = format!("m{i:03}");
        ok(&db, &["ZREM", "s", &member]).await;
    }
    assert!(!is_packed(&db, "s").await);
}

#[tokio::test]
async fn promotion_crosses_at_the_member_length_limit() {
    let db = Db::new();
    let at_limit = "x".repeat(64);
    ok(&db, &["ZADD", "s", "1", &at_limit]).await;
    assert!(is_packed(&db, "s").await);

    let over_limit = "y".repeat(65);
    ok(&db, &["ZADD", "s", "2", &over_limit]).await;
    assert!(!is_packed(&db, "s").await);

    // A long first member lands directly in the indexed encoding.
    ok(&db, &["ZADD", "t", "1", &over_limit]).await;
    assert!(!is_packed(&db, "t").await);
}

#[tokio::test]
async fn tuned_member_length_limit_above_255_stays_packed() {
    let mut config = Config::default();
    config.sorted_set.max_packed_value = 1024;
    let db = Db::with_config(&config);

    let long = "m".repeat(300);
    ok(&db, &["ZADD", "s", "1", &long, "2", "tail"]).await;
    assert!(is_packed(&db, "s").await);
    assert_eq!(ok(&db, &["ZSCORE", "s", &long]).await, bulk("1"));
    assert_eq!(
        ok(&db, &["ZRANGE", "s", "0", "-1"]).await,
        flat(&[&long, "tail"])
    );
    assert_eq!(
        ok(&db, &["ZREM", "s", &long]).await,
        RespValue::Integer(1)
    );
    assert_eq!(ok(&db, &["ZCARD", "s"]).await, RespValue::Integer(1));
}

#[tokio::test]
async fn reads_are_identical_across_encodings() {
    // The same data lands packed with default limits and indexed with a
    // tiny entry threshold; every read must agree.
    let mut tiny = Config::default();
    tiny.sorted_set.max_packed_entries = 2;
    let packed_db = Db::new();
    let indexed_db = Db::with_config(&tiny);

    for db in [&packed_db, &indexed_db] {
        ok(db, &["ZADD", "s", "1", "a", "2", "b", "2", "bb", "3", "c", "4", "d"]).await;
    }
    assert!(is_packed(&packed_db, "s").await);
    assert!(!is_packed(&indexed_db, "s").await);

    let queries: Vec<Vec<&str>> = vec![
        vec!["ZRANGE", "s", "0", "-1", "WITHSCORES"],
        vec!["ZRANGE", "s", "1", "3"],
        vec!["ZREVRANGE", "s", "0", "2"],
        vec!["ZRANGEBYSCORE", "s", "(1", "3"],
        vec!["ZRANGEBYSCORE", "s", "-inf", "+inf", "LIMIT", "2", "2"],
        vec!["ZREVRANGEBYSCORE", "s", "3", "(1", "LIMIT", "1", "2"],
        vec!["ZRANGEBYLEX", "s", "[b", "(d"],
        vec!["ZCOUNT", "s", "2", "3"],
        vec!["ZLEXCOUNT", "s", "[a", "+"],
        vec!["ZRANK", "s", "bb"],
        vec!["ZREVRANK", "s", "a"],
        vec!["ZSCORE", "s", "bb"],
        vec!["ZCARD", "s"],
    ];
    for query in queries {
        let from_packed = ok(&packed_db, &query).await;
        let from_indexed = ok(&indexed_db, &query).await;
        assert_eq!(from_packed, from_indexed, "diverged on {query:?}");
    }
}

#[tokio::test]
async fn removals_behave_identically_across_encodings() {
    let mut tiny = Config::default();
    tiny.sorted_set.max_packed_entries = 2;
    let packed_db = Db::new();
    let indexed_db = Db::with_config(&tiny);

    for db in [&packed_db, &indexed_db] {
        ok(db, &["ZADD", "s", "1", "a", "2", "b", "3", "c", "4", "d", "5", "e"]).await;
        assert_eq!(
            ok(db, &["ZREMRANGEBYRANK", "s", "0", "1"]).await,
            RespValue::Integer(2)
        );
        assert_eq!(
            ok(db, &["ZREMRANGEBYSCORE", "s", "(3", "4"]).await,
            RespValue::Integer(1)
        );
        assert_eq!(ok(db, &["ZRANGE", "s", "0", "-1"]).await, flat(&["c", "e"]));
    }
}

#[tokio::test]
async fn persisted_layout_round_trips_through_the_shard_hook() {
    let db = Db::new();
    ok(&db, &["ZADD", "s", "1.5", "a", "-inf", "b", "3", "c"]).await;

    let key = Bytes::from_static(b"s");
    let shard_index = db.get_shard_index(&key);
    let mut guard = db.get_shard(shard_index).entries.lock().await;
    let payload = guard.encode_value(&key).expect("key exists");

    // Tag byte, then a big-endian length of 3.
    assert_eq!(payload[0], 0);
    assert_eq!(&payload[1..5], &3u32.to_be_bytes());

    let decoded = SortedSet::decode(&payload, db.zset_limits).expect("valid payload");
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded.score(b"a"), Some(1.5));
    assert_eq!(decoded.score(b"b"), Some(f64::NEG_INFINITY));
    assert_eq!(decoded.score(b"c"), Some(3.0));
}
