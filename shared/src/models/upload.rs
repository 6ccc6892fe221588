//! Upload response

use serde::{Deserialize, Serialize};

/// Location of a stored object, `s3://<bucket>/<key>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub uri: String,
}
