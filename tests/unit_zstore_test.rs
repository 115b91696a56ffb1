// tests/unit_zstore_test.rs

mod common;

use common::{flat, ok, run, seed_string_key};
use zircondb::core::storage::db::Db;
use zircondb::core::{RespValue, ZirconError};

async fn seed_pair(db: &Db) {
    ok(db, &["ZADD", "k1", "1", "a", "2", "b"]).await;
    ok(db, &["ZADD", "k2", "10", "b", "20", "c"]).await;
}

#[tokio::test]
async fn union_with_weights_and_max_aggregate() {
    let db = Db::new();
    seed_pair(&db).await;
    assert_eq!(
        ok(
            &db,
            &[
                "ZUNIONSTORE", "out", "2", "k1", "k2", "WEIGHTS", "2", "3", "AGGREGATE", "MAX"
            ]
        )
        .await,
        RespValue::Integer(3)
    );
    assert_eq!(
        ok(&db, &["ZRANGE", "out", "0", "-1", "WITHSCORES"]).await,
        flat(&["a", "2", "b", "30", "c", "60"])
    );
}

#[tokio::test]
async fn inter_defaults_to_sum_with_unit_weights() {
    let db = Db::new();
    seed_pair(&db).await;
    assert_eq!(
        ok(&db, &["ZINTERSTORE", "out", "2", "k1", "k2", "AGGREGATE", "SUM"]).await,
        RespValue::Integer(1)
    );
    assert_eq!(
        ok(&db, &["ZRANGE", "out", "0", "-1", "WITHSCORES"]).await,
        flat(&["b", "12"])
    );
}

#[tokio::test]
async fn union_of_one_key_is_a_snapshot_copy() {
    let db = Db::new();
    ok(&db, &["ZADD", "k", "1", "x", "2", "y"]).await;
    assert_eq!(
        ok(&db, &["ZUNIONSTORE", "d", "1", "k", "WEIGHTS", "1"]).await,
        RespValue::Integer(2)
    );
    assert_eq!(
        ok(&db, &["ZRANGE", "d", "0", "-1", "WITHSCORES"]).await,
        flat(&["x", "1", "y", "2"])
    );
}

#[tokio::test]
async fn self_intersection_doubles_scores_under_sum() {
    let db = Db::new();
    ok(&db, &["ZADD", "k", "1.5", "x", "4", "y"]).await;
    assert_eq!(
        ok(&db, &["ZINTERSTORE", "d", "2", "k", "k", "AGGREGATE", "SUM"]).await,
        RespValue::Integer(2)
    );
    assert_eq!(
        ok(&db, &["ZRANGE", "d", "0", "-1", "WITHSCORES"]).await,
        flat(&["x", "3", "y", "8"])
    );
}

#[tokio::test]
async fn min_aggregate_and_absent_union_inputs() {
    let db = Db::new();
    seed_pair(&db).await;
    assert_eq!(
        ok(
            &db,
            &["ZUNIONSTORE", "out", "3", "k1", "missing", "k2", "AGGREGATE", "MIN"]
        )
        .await,
        RespValue::Integer(3)
    );
    assert_eq!(
        ok(&db, &["ZRANGE", "out", "0", "-1", "WITHSCORES"]).await,
        flat(&["a", "1", "b", "2", "c", "20"])
    );
}

#[tokio::test]
async fn intersection_with_any_absent_input_is_empty() {
    let db = Db::new();
    seed_pair(&db).await;
    // Pre-existing destination contents must be discarded.
    ok(&db, &["ZADD", "out", "9", "stale"]).await;
    assert_eq!(
        ok(&db, &["ZINTERSTORE", "out", "2", "k1", "missing"]).await,
        RespValue::Integer(0)
    );
    assert_eq!(ok(&db, &["ZCARD", "out"]).await, RespValue::Integer(0));
    assert_eq!(db.get_key_count(), 2);
}

#[tokio::test]
async fn destination_is_replaced_not_merged() {
    let db = Db::new();
    seed_pair(&db).await;
    ok(&db, &["ZADD", "out", "99", "stale"]).await;
    ok(&db, &["ZUNIONSTORE", "out", "1", "k1"]).await;
    assert_eq!(
        ok(&db, &["ZRANGE", "out", "0", "-1"]).await,
        flat(&["a", "b"])
    );
}

#[tokio::test]
async fn nan_weight_products_drop_members_without_failing() {
    let db = Db::new();
    ok(&db, &["ZADD", "k", "+inf", "edge", "2", "plain"]).await;
    // 0 × +inf is NaN: the member is skipped, the command succeeds.
    assert_eq!(
        ok(&db, &["ZUNIONSTORE", "out", "1", "k", "WEIGHTS", "0"]).await,
        RespValue::Integer(1)
    );
    assert_eq!(
        ok(&db, &["ZRANGE", "out", "0", "-1", "WITHSCORES"]).await,
        flat(&["plain", "0"])
    );
}

#[tokio::test]
async fn store_argument_errors_use_exact_strings() {
    let db = Db::new();
    let err = run(&db, &["ZUNIONSTORE", "out", "0"]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "at least 1 input key is needed for zunionstore"
    );
    let err = run(&db, &["ZINTERSTORE", "out", "0"]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "at least 1 input key is needed for zinterstore"
    );

    let err = run(&db, &["ZUNIONSTORE", "out", "1", "k", "WEIGHTS", "heavy"])
        .await
        .unwrap_err();
    assert_eq!(err, ZirconError::WeightNotAFloat);
    assert_eq!(err.to_string(), "weight value is not a float");

    assert_eq!(
        run(&db, &["ZUNIONSTORE", "out", "2", "k1"]).await.unwrap_err(),
        ZirconError::SyntaxError
    );
    assert_eq!(
        run(&db, &["ZUNIONSTORE", "out", "1", "k", "AGGREGATE", "median"])
            .await
            .unwrap_err(),
        ZirconError::SyntaxError
    );
}

#[tokio::test]
async fn wrong_typed_input_fails_the_whole_command() {
    let db = Db::new();
    seed_pair(&db).await;
    seed_string_key(&db, "str").await;
    assert_eq!(
        run(&db, &["ZUNIONSTORE", "out", "2", "k1", "str"])
            .await
            .unwrap_err(),
        ZirconError::WrongType
    );
    assert_eq!(
        run(&db, &["ZINTERSTORE", "out", "2", "k1", "str"])
            .await
            .unwrap_err(),
        ZirconError::WrongType
    );
    // Nothing was written to the destination.
    assert_eq!(ok(&db, &["ZCARD", "out"]).await, RespValue::Integer(0));
}

#[tokio::test]
async fn many_keys_across_shards_aggregate_correctly() {
    let db = Db::new();
    // Spread inputs across shards; every set shares the member "common".
    let mut names = Vec::new();
    for i in 0..12 {
        let name = format!("in{i}");
        let score = format!("{i}");
        ok(&db, &["ZADD", &name, &score, "common", "1", &format!("only{i}")]).await;
        names.push(name);
    }
    let mut parts = vec!["ZUNIONSTORE", "out", "12"];
    for name in &names {
        parts.push(name);
    }
    // 0 + 1 + ... + 11 = 66 for the shared member; 12 singletons beside it.
    assert_eq!(ok(&db, &parts).await, RespValue::Integer(13));
    assert_eq!(ok(&db, &["ZSCORE", "out", "common"]).await, common::bulk("66"));

    let mut parts = vec!["ZINTERSTORE", "iout", "12"];
    for name in &names {
        parts.push(name);
    }
    assert_eq!(ok(&db, &parts).await, RespValue::Integer(1));
    assert_eq!(ok(&db, &["ZSCORE", "iout", "common"]).await, common::bulk("66"));
}
