//! Error types for platform detection
//!
//! One variant per failure point of a detection pass. Each variant wraps the
//! lower-level cause, reachable through [`std::error::Error::source`], while
//! its display string names only the failure point.

use crate::platform::PlatformInfo;
use thiserror::Error;

/// Unified error type for platform detection
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Defaulting Errors
    // =========================================================================
    #[error("error fetching REST config to replace passed nil")]
    RestConfigFetch(#[source] kube::config::InferConfigError),

    #[error("error getting new DiscoveryClient")]
    DiscoveryClientFetch(#[source] kube::Error),

    #[error("error while defaulting non-provided args for PlatformInfo fetch")]
    DefaultingArgs(#[source] Box<Error>),

    // =========================================================================
    // Discovery Errors
    // =========================================================================
    #[error("error fetching K8S version from ServerVersion")]
    K8sVersionFetch(#[source] kube::Error),

    #[error("error fetching ServerGroups from discovery client")]
    ServerGroupsFetch(#[source] kube::Error),

    #[error("error fetching OpenAPISchema")]
    OpenApiSchemaFetch(#[source] kube::Error),

    // =========================================================================
    // Cluster Version Fallback Errors
    // =========================================================================
    #[error("error fetching OCP4 version via API")]
    ClusterVersionFetch(#[source] kube::Error),

    #[error("error unmarshalling version API result to ClusterVersionInfo")]
    VersionMarshalling(#[source] serde_json::Error),

    // =========================================================================
    // Boolean Query Errors
    // =========================================================================
    #[error("error fetching PlatformInfo")]
    InfoFetch(#[source] Box<DetectionError>),
}

impl Error {
    /// Check if this error is caused by a transport failure talking to the cluster
    pub fn is_transient(&self) -> bool {
        match self {
            Error::K8sVersionFetch(_)
            | Error::ServerGroupsFetch(_)
            | Error::OpenApiSchemaFetch(_)
            | Error::ClusterVersionFetch(_) => true,
            Error::DefaultingArgs(inner) => inner.is_transient(),
            Error::InfoFetch(inner) => inner.source.is_transient(),
            Error::RestConfigFetch(_)
            | Error::DiscoveryClientFetch(_)
            | Error::VersionMarshalling(_) => false,
        }
    }

    /// Check if re-running the whole detection pass could succeed
    pub fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// A failed detection pass together with everything learned before the failing step
#[derive(Error, Debug)]
#[error("platform detection failed")]
pub struct DetectionError {
    /// Partially filled descriptor
    pub info: PlatformInfo,
    /// The failure point
    #[source]
    pub source: Error,
}

impl DetectionError {
    pub fn new(info: PlatformInfo, source: Error) -> Self {
        Self { info, source }
    }
}

/// Result type alias for platform detection
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::api_error;

    fn marshalling_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn test_error_display_names_failure_point() {
        let err = Error::K8sVersionFetch(api_error());
        assert_eq!(err.to_string(), "error fetching K8S version from ServerVersion");

        let err = Error::DefaultingArgs(Box::new(Error::DiscoveryClientFetch(api_error())));
        assert_eq!(
            err.to_string(),
            "error while defaulting non-provided args for PlatformInfo fetch"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = Error::ServerGroupsFetch(api_error());
        let source = err.source().expect("cause is kept");
        assert!(source.to_string().contains("oops"));

        let err = Error::InfoFetch(Box::new(DetectionError::new(
            PlatformInfo::default(),
            Error::OpenApiSchemaFetch(api_error()),
        )));
        let detection = err.source().unwrap();
        assert_eq!(detection.to_string(), "platform detection failed");
        assert_eq!(
            detection.source().unwrap().to_string(),
            "error fetching OpenAPISchema"
        );
    }

    #[test]
    fn test_error_retryable() {
        let transient = Error::ClusterVersionFetch(api_error());
        assert!(transient.is_retryable());
        assert!(transient.is_transient());

        let malformed = Error::VersionMarshalling(marshalling_error());
        assert!(!malformed.is_retryable());

        let no_client = Error::DefaultingArgs(Box::new(Error::DiscoveryClientFetch(api_error())));
        assert!(!no_client.is_retryable());

        let wrapped = Error::InfoFetch(Box::new(DetectionError::new(
            PlatformInfo::default(),
            Error::K8sVersionFetch(api_error()),
        )));
        assert!(wrapped.is_retryable());
    }
}
