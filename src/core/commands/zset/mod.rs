// src/core/commands/zset/mod.rs

//! The sorted-set command family.

pub mod helpers;
pub mod store_ops;
pub mod zadd;
pub mod zcard;
pub mod zcount;
pub mod zincrby;
pub mod zlexcount;
pub mod zrange;
pub mod zrangebylex;
pub mod zrangebyscore;
pub mod zrank;
pub mod zrem;
pub mod zremrange;
pub mod zrevrange;
pub mod zscan;
pub mod zscore;

pub use store_ops::{Aggregate, ZInterStore, ZUnionStore};
pub use zadd::Zadd;
pub use zcard::ZCard;
pub use zcount::ZCount;
pub use zincrby::ZIncrBy;
pub use zlexcount::ZLexCount;
pub use zrange::ZRange;
pub use zrangebylex::ZRangeByLex;
pub use zrangebyscore::{ZRangeByScore, ZRevRangeByScore};
pub use zrank::{ZRank, ZRevRank};
pub use zrem::ZRem;
pub use zremrange::{ZRemRangeByLex, ZRemRangeByRank, ZRemRangeByScore};
pub use zrevrange::ZRevRange;
pub use zscan::ZScan;
pub use zscore::ZScore;
