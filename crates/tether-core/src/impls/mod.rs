//! Impls - port implementations for development and tests.
//!
//! 本番用実装（Redis 等のステータスストア）は別クレートに配置します。

pub mod inmem_store;

pub use self::inmem_store::{InMemoryStatusStore, JobEnvelope, StoreCounts};
