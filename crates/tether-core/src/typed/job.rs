//! Job trait - typed job definitions.
//!
//! Associates a params struct with its job-type name at compile time, so a
//! typo'd job type is a compile error instead of a job nobody picks up.

use serde::Serialize;

use crate::domain::Payload;
use crate::error::FutureError;

/// A typed job definition: params shape + job-type name.
///
/// # 使用例
/// ```ignore
/// #[derive(Serialize)]
/// struct Resize {
///     path: String,
///     width: u32,
/// }
///
/// impl Job for Resize {
///     const TYPE: &'static str = "image.resize";
/// }
/// ```
///
/// # Trait Bounds
/// - `Serialize`: params go to the store as a JSON object
/// - `Send + Sync + 'static`: submittable from any task, usable behind `Arc`
pub trait Job: Serialize + Send + Sync + 'static {
    /// Job-type name registered with the external queue.
    const TYPE: &'static str;
}

/// Encode a job's params for submission.
///
/// Params must serialize to a JSON object (the store's payload contract is an
/// ordered string-keyed mapping); anything else is an encode error.
pub fn encode_params<J: Job>(job: &J) -> Result<Payload, FutureError> {
    match serde_json::to_value(job) {
        Ok(serde_json::Value::Object(params)) => Ok(params),
        Ok(other) => Err(FutureError::Encode(format!(
            "job params must encode to a JSON object, got: {other}"
        ))),
        Err(e) => Err(FutureError::Encode(format!("json encode: {e}"))),
    }
}
