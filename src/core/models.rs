use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A local file to be written to `bucket/object_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub bucket: String,
    pub object_name: String,
}

impl UploadRequest {
    pub fn new(local_path: &Path, bucket: &str, object_name: &str) -> Self {
        Self {
            local_path: local_path.to_path_buf(),
            bucket: bucket.to_string(),
            object_name: object_name.to_string(),
        }
    }
}

/// Identity of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub object_name: String,
}

impl ObjectLocation {
    pub fn new(bucket: &str, object_name: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            object_name: object_name.to_string(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.object_name)
    }
}

/// Acknowledgement returned once an object has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAck {
    pub location: ObjectLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub source_text: String,
    pub instruction_template: String,
    pub temperature: f32,
}

impl SummaryRequest {
    /// Placeholder in `instruction_template` replaced by the source text.
    pub const TEXT_PLACEHOLDER: &'static str = "{text}";

    #[must_use]
    pub fn prompt(&self) -> String {
        self.instruction_template
            .replace(Self::TEXT_PLACEHOLDER, &self.source_text)
    }
}

/// Successful response body of the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}
