//! tether-core
//!
//! Future/promise layer over an asynchronous job-status store: submit a job,
//! get a [`future::JobFuture`] back, chain dependent jobs with `then`, block
//! on one chain with `wait` or on many with `wait_all`.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（JobId, JobType, JobState, JobStatus）
//! - **ports**: 抽象化レイヤー（StatusStore, Clock）
//! - **future**: コア - StatusHandle, JobFuture（wait/status/then）, wait_all
//! - **typed**: 型付き Job API（Job trait, JobClient）
//! - **impls**: 実装（InMemoryStatusStore など開発用）

pub mod domain;
pub mod error;
pub mod future;
pub mod impls;
pub mod ports;
pub mod typed;
