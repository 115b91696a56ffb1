// tests/unit_zrange_test.rs

mod common;

use common::{flat, ok, run};
use zircondb::core::storage::db::Db;
use zircondb::core::{RespValue, ZirconError};

async fn seed(db: &Db) {
    ok(db, &["ZADD", "s", "1", "a", "2", "b", "3", "c", "4", "d"]).await;
}

#[tokio::test]
async fn zrange_full_and_subranges() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZRANGE", "s", "0", "-1"]).await,
        flat(&["a", "b", "c", "d"])
    );
    assert_eq!(ok(&db, &["ZRANGE", "s", "1", "2"]).await, flat(&["b", "c"]));
    assert_eq!(ok(&db, &["ZRANGE", "s", "-2", "-1"]).await, flat(&["c", "d"]));
    // Out-of-bounds ends clamp; inverted ranges are empty.
    assert_eq!(ok(&db, &["ZRANGE", "s", "2", "100"]).await, flat(&["c", "d"]));
    assert_eq!(ok(&db, &["ZRANGE", "s", "3", "1"]).await, flat(&[]));
    assert_eq!(ok(&db, &["ZRANGE", "s", "10", "20"]).await, flat(&[]));
}

#[tokio::test]
async fn zrange_withscores_interleaves() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZRANGE", "s", "0", "1", "WITHSCORES"]).await,
        flat(&["a", "1", "b", "2"])
    );
}

#[tokio::test]
async fn zrange_on_missing_key_is_empty_array_not_null() {
    let db = Db::new();
    assert_eq!(ok(&db, &["ZRANGE", "nope", "0", "-1"]).await, flat(&[]));
}

#[tokio::test]
async fn zrange_byscore_token() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZRANGE", "s", "(1", "3", "BYSCORE"]).await,
        flat(&["b", "c"])
    );
    assert_eq!(
        ok(&db, &["ZRANGE", "s", "-inf", "+inf", "BYSCORE", "WITHSCORES"]).await,
        flat(&["a", "1", "b", "2", "c", "3", "d", "4"])
    );
}

#[tokio::test]
async fn zrange_rejects_unknown_tokens_and_bad_indices() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        run(&db, &["ZRANGE", "s", "0", "-1", "NOSUCH"]).await.unwrap_err(),
        ZirconError::SyntaxError
    );
    assert_eq!(
        run(&db, &["ZRANGE", "s", "zero", "-1"]).await.unwrap_err(),
        ZirconError::NotAnInteger
    );
}

#[tokio::test]
async fn zrevrange_walks_from_the_tail() {
    let db = Db::new();
    seed(&db).await;
    assert_eq!(
        ok(&db, &["ZREVRANGE", "s", "0", "-1"]).await,
        flat(&["d", "c", "b", "a"])
    );
    assert_eq!(ok(&db, &["ZREVRANGE", "s", "0", "1"]).await, flat(&["d", "c"]));
    assert_eq!(
        ok(&db, &["ZREVRANGE", "s", "1", "2", "WITHSCORES"]).await,
        flat(&["c", "3", "b", "2"])
    );
}

#[tokio::test]
async fn equal_scores_order_lexicographically() {
    let db = Db::new();
    ok(&db, &["ZADD", "t", "0", "mango", "0", "apple", "0", "cherry"]).await;
    assert_eq!(
        ok(&db, &["ZRANGE", "t", "0", "-1"]).await,
        flat(&["apple", "cherry", "mango"])
    );
    assert_eq!(
        ok(&db, &["ZREVRANGE", "t", "0", "-1"]).await,
        flat(&["mango", "cherry", "apple"])
    );
}

#[tokio::test]
async fn rank_bijection_holds() {
    let db = Db::new();
    seed(&db).await;
    for member in ["a", "b", "c", "d"] {
        let RespValue::Integer(rank) = ok(&db, &["ZRANK", "s", member]).await else {
            panic!("rank should be an integer");
        };
        let r = rank.to_string();
        assert_eq!(ok(&db, &["ZRANGE", "s", &r, &r]).await, flat(&[member]));
    }
}
