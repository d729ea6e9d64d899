/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input did not deserialize; `path` is the JSON path of the failure.
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },

    /// The operation documents no `"200"` response.
    #[error("no \"200\" response documented")]
    MissingSuccessResponse,

    /// Failure while extracting a single operation.
    #[error("invalid operation {method} {uri}")]
    InvalidOperation {
        method: String,
        uri: String,
        #[source]
        source: Box<Error>,
    },

    /// jq pre-filter failed to parse, compile or run.
    #[error("jq filter failed: {0}")]
    Filter(String),

    #[error("jq filter produced {count} documents, expected exactly one")]
    UnexpectedFilterOutput { count: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
