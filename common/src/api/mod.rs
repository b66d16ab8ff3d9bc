pub mod v1;

pub use v1::*;

use serde::{Deserialize, Serialize};

/// Header carrying the contract version between the gateway and the model server.
pub const API_VERSION_HEADER: &str = "x-api-version";
pub const API_VERSION: &str = "1";

/// Error body returned by both services for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
