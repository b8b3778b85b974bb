use thiserror::Error;

/// Discovery-related errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("failed to read snapshot: {0}")]
    ReadFailed(String),

    #[error("failed to parse snapshot: {0}")]
    ParseFailed(#[from] serde_yaml::Error),

    #[error("malformed object in snapshot: {0}")]
    MalformedObject(#[from] serde_json::Error),

    #[error("Cluster '{namespace}/{name}' not found")]
    ClusterNotFound { namespace: String, name: String },
}

impl DiscoveryError {
    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    pub fn cluster_not_found(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::ClusterNotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}
