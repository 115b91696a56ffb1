// tests/unit_zrangebyscore_test.rs

mod common;

use common::{flat, ok, run};
use zircondb::core::storage::db::Db;
use zircondb::core::ZirconError;

async fn seed(db: &Db) {
    ok(db, &["ZADD", "s", "1", "a", "2", "b", "3", "c", "4", "d"]).await;
}

#[tokio::test]
async fn closed_and_open_bounds() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "2", "3"]).await,
        flat(&["b", "c"])
    );
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "(2", "3"]).await,
        flat(&["c"])
    );
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "(1", "(4"]).await,
        flat(&["b", "c"])
    );
    // Open-open identical bounds select nothing.
    assert_eq!(ok(&db, &["ZRANGEBYSCORE", "s", "(1", "(1"]).await, flat(&[]));
}

#[tokio::test]
async fn infinity_bounds_cover_everything() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "-inf", "+inf"]).await,
        flat(&["a", "b", "c", "d"])
    );
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "+inf", "-inf"]).await,
        flat(&[])
    );
}

#[tokio::test]
async fn limit_applies_offset_then_count() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "-inf", "+inf", "LIMIT", "1", "1"]).await,
        flat(&["b"])
    );
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "-inf", "+inf", "LIMIT", "1", "2"]).await,
        flat(&["b", "c"])
    );
    // An offset past the in-range count yields empty output, not an error.
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "-inf", "+inf", "LIMIT", "9", "2"]).await,
        flat(&[])
    );
    // The unbounded-count sentinel.
    let max = u32::MAX.to_string();
    assert_eq!(
        ok(&db, &["ZRANGEBYSCORE", "s", "2", "+inf", "LIMIT", "0", &max]).await,
        flat(&["b", "c", "d"])
    );
}

#[tokio::test]
async fn withscores_and_limit_combine() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(
            &db,
            &["ZRANGEBYSCORE", "s", "1", "4", "WITHSCORES", "LIMIT", "1", "2"]
        )
        .await,
        flat(&["b", "2", "c", "3"])
    );
}

#[tokio::test]
async fn reverse_variant_takes_max_first() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZREVRANGEBYSCORE", "s", "+inf", "-inf"]).await,
        flat(&["d", "c", "b", "a"])
    );
    assert_eq!(
        ok(&db, &["ZREVRANGEBYSCORE", "s", "3", "(1"]).await,
        flat(&["c", "b"])
    );
    assert_eq!(
        ok(&db, &["ZREVRANGEBYSCORE", "s", "+inf", "-inf", "LIMIT", "1", "2"]).await,
        flat(&["c", "b"])
    );
}

#[tokio::test]
async fn bound_parse_failures_use_the_range_error() {
    let db = Db::new();
    seed(&db).await;
    let err = run(&db, &["ZRANGEBYSCORE", "s", "abc", "3"]).await.unwrap_err();
    assert_eq!(err, ZirconError::FloatRange);
    assert_eq!(err.to_string(), "min or max is not a float");
    assert_eq!(
        run(&db, &["ZRANGEBYSCORE", "s", "1", "nan"]).await.unwrap_err(),
        ZirconError::FloatRange
    );
    assert_eq!(
        run(&db, &["ZRANGEBYSCORE", "s", "1", "3", "LIMIT", "1"])
            .await
            .unwrap_err(),
        ZirconError::SyntaxError
    );
    assert_eq!(
        run(&db, &["ZRANGEBYSCORE", "s", "1", "3", "LIMIT", "x", "2"])
            .await
            .unwrap_err(),
        ZirconError::NotAnInteger
    );
}

#[tokio::test]
async fn zcount_matches_materialized_ranges() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZCOUNT", "s", "-inf", "+inf"]).await,
        zircondb::RespValue::Integer(4)
    );
    assert_eq!(
        ok(&db, &["ZCOUNT", "s", "(1", "3"]).await,
        zircondb::RespValue::Integer(2)
    );
    assert_eq!(
        ok(&db, &["ZCOUNT", "s", "(1", "(1"]).await,
        zircondb::RespValue::Integer(0)
    );
    assert_eq!(
        ok(&db, &["ZCOUNT", "missing", "-inf", "+inf"]).await,
        zircondb::RespValue::Integer(0)
    );
}
