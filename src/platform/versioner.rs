//! Kubernetes-based Platform Versioner
//!
//! Resolves a cluster into a [`PlatformInfo`] by walking its discovery
//! surface in a fixed order:
//!
//! 1. server version (Kubernetes `<major>.<minor>` and OS)
//! 2. server API groups (`route.openshift.io` marks OpenShift)
//! 3. OpenAPI schema version (OpenShift only)
//! 4. `clusterversions/version` resource (OpenShift 4 only)
//!
//! Every step is awaited before the next one starts and the first failure
//! ends the pass.

use crate::domain::ports::{Discoverer, DiscovererRef, PlatformVersioner};
use crate::error::{DetectionError, Error, Result};
use crate::platform::{ClusterVersionInfo, KubeDiscoverer, PlatformInfo, PlatformType};
use async_trait::async_trait;
use kube::Config;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument, Span};

/// API group only served by OpenShift
pub const ROUTE_API_GROUP: &str = "route.openshift.io";

/// ClusterVersion resource holding the desired OpenShift 4 release
pub const CLUSTER_VERSION_API_PATH: &str = "apis/config.openshift.io/v1/clusterversions/version";

/// OpenShift 3.x reports its own release in the OpenAPI schema
const OCP3_SCHEMA_PREFIX: &str = "v3.1";

/// OpenShift 4.x reports the Kubernetes release instead (bugzilla-1658957)
const OCP4_SCHEMA_PREFIX: &str = "v1.1";

// =============================================================================
// Versioner
// =============================================================================

/// Platform versioner driving a [`Discoverer`]
///
/// Diagnostics are emitted under the span the versioner was built with.
#[derive(Debug, Clone)]
pub struct K8sBasedPlatformVersioner {
    span: Span,
}

impl Default for K8sBasedPlatformVersioner {
    fn default() -> Self {
        Self::with_span(info_span!("platform_versioner"))
    }
}

impl K8sBasedPlatformVersioner {
    /// Create a versioner with the default span
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a versioner that logs under `span`
    pub fn with_span(span: Span) -> Self {
        Self { span }
    }

    /// Fill in arguments the caller did not provide
    ///
    /// A missing config is inferred from the environment (kubeconfig, then
    /// in-cluster); a missing discoverer is built from the resolved config.
    pub async fn default_args(
        &self,
        discoverer: Option<DiscovererRef>,
        config: Option<Config>,
    ) -> Result<(DiscovererRef, Config)> {
        let config = match config {
            Some(config) => config,
            None => {
                debug!("No REST config passed, inferring from environment");
                Config::infer()
                    .await
                    .map_err(Error::RestConfigFetch)
                    .map_err(log_failure)?
            }
        };

        let discoverer: DiscovererRef = match discoverer {
            Some(discoverer) => discoverer,
            None => Arc::new(
                KubeDiscoverer::try_from_config(config.clone())
                    .map_err(Error::DiscoveryClientFetch)
                    .map_err(log_failure)?,
            ),
        };

        Ok((discoverer, config))
    }

    async fn detect(
        &self,
        discoverer: Option<DiscovererRef>,
        config: Option<Config>,
        info: &mut PlatformInfo,
    ) -> Result<()> {
        let (discoverer, _config) = self
            .default_args(discoverer, config)
            .await
            .map_err(|e| log_failure(Error::DefaultingArgs(Box::new(e))))?;

        let version = discoverer
            .server_version()
            .await
            .map_err(Error::K8sVersionFetch)
            .map_err(log_failure)?;
        info.k8s_version = format!("{}.{}", version.major, version.minor);
        info.os = version.platform;

        let groups = discoverer
            .server_groups()
            .await
            .map_err(Error::ServerGroupsFetch)
            .map_err(log_failure)?;

        if !groups.groups.iter().any(|g| g.name == ROUTE_API_GROUP) {
            return Ok(());
        }

        info.name = PlatformType::OpenShift;
        info!("{} found in apis, platform is OpenShift", ROUTE_API_GROUP);

        let doc = discoverer
            .openapi_schema()
            .await
            .map_err(Error::OpenApiSchemaFetch)
            .map_err(log_failure)?;

        match doc.info.version.get(..4) {
            Some(OCP3_SCHEMA_PREFIX) => {
                info.ocp_version = doc.info.version.clone();
            }
            Some(OCP4_SCHEMA_PREFIX) => {
                debug!(
                    "OpenAPI schema reports {}, reading ClusterVersion instead",
                    doc.info.version
                );
                info.ocp_version = cluster_version(discoverer.as_ref()).await?;
            }
            _ => {}
        }

        Ok(())
    }
}

#[async_trait]
impl PlatformVersioner for K8sBasedPlatformVersioner {
    async fn platform_info(
        &self,
        discoverer: Option<DiscovererRef>,
        config: Option<Config>,
    ) -> std::result::Result<PlatformInfo, DetectionError> {
        async move {
            info!("detecting platform version...");
            let mut info = PlatformInfo::default();

            match self.detect(discoverer, config, &mut info).await {
                Ok(()) => {
                    info!("{}", info);
                    Ok(info)
                }
                Err(source) => Err(DetectionError::new(info, source)),
            }
        }
        .instrument(self.span.clone())
        .await
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Read the desired release from the ClusterVersion resource
async fn cluster_version(discoverer: &dyn Discoverer) -> Result<String> {
    let body = discoverer
        .raw_get(CLUSTER_VERSION_API_PATH)
        .await
        .map_err(Error::ClusterVersionFetch)
        .map_err(log_failure)?;

    let cvi: ClusterVersionInfo = serde_json::from_slice(&body)
        .map_err(Error::VersionMarshalling)
        .map_err(log_failure)?;

    Ok(cvi.status.desired.version)
}

fn log_failure(err: Error) -> Error {
    match std::error::Error::source(&err) {
        Some(cause) => error!(error = %cause, "{}", err),
        None => error!("{}", err),
    }
    err
}
