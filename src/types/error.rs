use thiserror::Error;

/// Why a pull request search failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run gh: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("gh exited with {status}: {stderr}")]
    Command { status: String, stderr: String },

    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}
