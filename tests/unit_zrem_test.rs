// tests/unit_zrem_test.rs

mod common;

use common::{flat, ok, run, seed_string_key};
use zircondb::core::storage::db::Db;
use zircondb::core::{RespValue, ZirconError};

#[tokio::test]
async fn zrem_counts_only_present_members() {
    let db = Db::new();
    ok(&db, &["ZADD", "s", "1", "a", "2", "b", "3", "c"]).await;
    assert_eq!(
        ok(&db, &["ZREM", "s", "a", "nope", "c"]).await,
        RespValue::Integer(2)
    );
    assert_eq!(ok(&db, &["ZRANGE", "s", "0", "-1"]).await, flat(&["b"]));
    assert_eq!(ok(&db, &["ZREM", "missing", "a"]).await, RespValue::Integer(0));
}

#[tokio::test]
async fn zrem_destroys_the_key_when_the_set_empties() {
    let db = Db::new();
    ok(&db, &["ZADD", "s", "1", "a"]).await;
    assert_eq!(db.get_key_count(), 1);
    assert_eq!(ok(&db, &["ZREM", "s", "a"]).await, RespValue::Integer(1));
    assert_eq!(db.get_key_count(), 0);
    assert_eq!(ok(&db, &["ZSCORE", "s", "a"]).await, RespValue::Null);
}

#[tokio::test]
async fn zrem_wrong_type_errors() {
    let db = Db::new();
    seed_string_key(&db, "str").await;
    assert_eq!(
        run(&db, &["ZREM", "str", "a"]).await.unwrap_err(),
        ZirconError::WrongType
    );
}

#[tokio::test]
async fn zremrangebyrank_normalizes_indices() {
    let db = Db::new();
    ok(&db, &["ZADD", "s", "1", "a", "2", "b", "3", "c", "4", "d"]).await;
    assert_eq!(
        ok(&db, &["ZREMRANGEBYRANK", "s", "0", "1"]).await,
        RespValue::Integer(2)
    );
    assert_eq!(ok(&db, &["ZRANGE", "s", "0", "-1"]).await, flat(&["c", "d"]));
    assert_eq!(
        ok(&db, &["ZREMRANGEBYRANK", "s", "-1", "-1"]).await,
        RespValue::Integer(1)
    );
    assert_eq!(ok(&db, &["ZRANGE", "s", "0", "-1"]).await, flat(&["c"]));
    assert_eq!(
        ok(&db, &["ZREMRANGEBYRANK", "s", "5", "9"]).await,
        RespValue::Integer(0)
    );
}

#[tokio::test]
async fn zremrangebyscore_honors_bounds() {
    let db = Db::new();
    ok(&db, &["ZADD", "s", "1", "a", "2", "b", "3", "c", "4", "d"]).await;
    assert_eq!(
        ok(&db, &["ZREMRANGEBYSCORE", "s", "(1", "3"]).await,
        RespValue::Integer(2)
    );
    assert_eq!(ok(&db, &["ZRANGE", "s", "0", "-1"]).await, flat(&["a", "d"]));
}

#[tokio::test]
async fn zremrangebylex_deletes_member_spans() {
    let db = Db::new();
    ok(&db, &["ZADD", "s", "0", "a", "0", "b", "0", "c", "0", "d"]).await;
    assert_eq!(
        ok(&db, &["ZREMRANGEBYLEX", "s", "[b", "(d"]).await,
        RespValue::Integer(2)
    );
    assert_eq!(ok(&db, &["ZRANGE", "s", "0", "-1"]).await, flat(&["a", "d"]));
}

#[tokio::test]
async fn remove_ranges_destroy_emptied_keys() {
    let db = Db::new();
    ok(&db, &["ZADD", "s", "1", "a", "2", "b"]).await;
    assert_eq!(
        ok(&db, &["ZREMRANGEBYSCORE", "s", "-inf", "+inf"]).await,
        RespValue::Integer(2)
    );
    assert_eq!(db.get_key_count(), 0);
}
