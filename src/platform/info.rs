//! Platform descriptor and the raw payloads read during detection

use serde::{Deserialize, Serialize};

// =============================================================================
// Platform Descriptor
// =============================================================================

/// Cluster distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    #[default]
    Kubernetes,
    OpenShift,
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformType::Kubernetes => write!(f, "Kubernetes"),
            PlatformType::OpenShift => write!(f, "OpenShift"),
        }
    }
}

/// Result of one detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    /// Detected distribution
    pub name: PlatformType,
    /// Kubernetes `<major>.<minor>`
    pub k8s_version: String,
    /// OpenShift version, when it could be resolved
    pub ocp_version: String,
    /// Platform string reported by the API server (e.g. `linux/amd64`)
    pub os: String,
}

impl PlatformInfo {
    pub fn is_openshift(&self) -> bool {
        self.name == PlatformType::OpenShift
    }
}

impl std::fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PlatformInfo [Name: {}, K8SVersion: {}, OS: {}",
            self.name, self.k8s_version, self.os
        )?;
        if !self.ocp_version.is_empty() {
            write!(f, ", OCPVersion: {}", self.ocp_version)?;
        }
        write!(f, "]")
    }
}

// =============================================================================
// Raw Payloads
// =============================================================================

/// Subset of an OpenAPI document; only `info.version` is read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub info: OpenApiInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiInfo {
    #[serde(default)]
    pub version: String,
}

impl OpenApiDocument {
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            info: OpenApiInfo {
                version: version.into(),
            },
        }
    }
}

/// Body of the `clusterversions/version` resource; only `status.desired.version` is read
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClusterVersionInfo {
    pub status: ClusterVersionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClusterVersionStatus {
    pub desired: DesiredVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DesiredVersion {
    pub version: String,
}
