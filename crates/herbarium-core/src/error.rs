#[derive(Debug, thiserror::Error)]
pub enum HerbariumError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftohtml not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftohtmlNotFound,

    #[error("pdftohtml failed with exit code {code}: {stderr}")]
    PdftohtmlFailed { code: i32, stderr: String },

    #[error("malformed pdftohtml XML: {0}")]
    Xml(String),

    #[error("unknown profile '{name}'. Available: {available}")]
    UnknownProfile { name: String, available: String },

    #[error("invalid profile '{profile}': {reason}")]
    ProfileInvalid { profile: String, reason: String },

    #[error("invalid page selection '{0}' (expected e.g. '4', '4-14' or '17,19')")]
    InvalidPages(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
