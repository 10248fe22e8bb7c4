//! OpenShift detection
//!
//! Collapses a detection pass into a yes/no answer. Any failure is reported
//! as [`Error::InfoFetch`], which callers should read as "not OpenShift".

use crate::domain::ports::PlatformVersioner;
use crate::error::{Error, Result};
use crate::platform::K8sBasedPlatformVersioner;
use kube::Config;
use tracing::error;

/// Detect whether the cluster is OpenShift
///
/// `versioner` defaults to [`K8sBasedPlatformVersioner`], which infers the
/// connection from the environment when `config` is `None`.
pub async fn detect_openshift(
    versioner: Option<&dyn PlatformVersioner>,
    config: Option<Config>,
) -> Result<bool> {
    let default_versioner;
    let versioner = match versioner {
        Some(versioner) => versioner,
        None => {
            default_versioner = K8sBasedPlatformVersioner::default();
            &default_versioner as &dyn PlatformVersioner
        }
    };

    match versioner.platform_info(None, config).await {
        Ok(info) => Ok(info.is_openshift()),
        Err(err) => {
            error!(error = %err.source, "error fetching PlatformInfo, returning false");
            Err(Error::InfoFetch(Box::new(err)))
        }
    }
}

/// Same as [`detect_openshift`] with the default versioner
pub async fn is_openshift(config: Option<Config>) -> Result<bool> {
    detect_openshift(None, config).await
}
