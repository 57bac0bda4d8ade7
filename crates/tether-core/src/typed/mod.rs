//! Typed job API.
//!
//! job_type の typo を型で排除します: a job's params struct carries its
//! type name as an associated constant, and the client encodes/submits it.

pub mod client;
pub mod job;

pub use self::client::JobClient;
pub use self::job::{Job, encode_params};
