//! Domain Ports - Core trait definitions for platform detection
//!
//! These traits define the boundary between the detection logic and the
//! cluster connection. Adapters implement them to provide concrete
//! functionality; tests implement them with deterministic stand-ins.

use crate::error::DetectionError;
use crate::platform::{OpenApiDocument, PlatformInfo};
use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIGroupList;
use k8s_openapi::apimachinery::pkg::version::Info;
use std::sync::Arc;

// =============================================================================
// Discoverer Port
// =============================================================================

/// Port for read-only discovery queries against a live cluster
///
/// Implementations must not retry, pool or cache; every call maps to exactly
/// one request against the API server.
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Fetch the API server version
    async fn server_version(&self) -> Result<Info, kube::Error>;

    /// Fetch the API groups registered on the cluster
    async fn server_groups(&self) -> Result<APIGroupList, kube::Error>;

    /// Fetch the OpenAPI schema document
    async fn openapi_schema(&self) -> Result<OpenApiDocument, kube::Error>;

    /// Issue a GET against an absolute API path and return the raw body
    async fn raw_get(&self, path: &str) -> Result<Vec<u8>, kube::Error>;
}

// =============================================================================
// Platform Versioner Port
// =============================================================================

/// Port for resolving a cluster into a [`PlatformInfo`]
#[async_trait]
pub trait PlatformVersioner: Send + Sync {
    /// Run one detection pass
    ///
    /// Missing arguments are defaulted from the environment. On failure the
    /// error carries whatever was learned before the failing step.
    async fn platform_info(
        &self,
        discoverer: Option<DiscovererRef>,
        config: Option<kube::Config>,
    ) -> Result<PlatformInfo, DetectionError>;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type DiscovererRef = Arc<dyn Discoverer>;
