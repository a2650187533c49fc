//! Per-resource façades over `TestHubClient`.

mod configs;
mod scenarios;
mod test_cases;

pub use configs::ConfigsApi;
pub use scenarios::ScenariosApi;
pub use test_cases::TestCasesApi;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Convert a caller payload into the JSON body, untouched.
fn json_body<P: Serialize + ?Sized>(payload: &P) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}
