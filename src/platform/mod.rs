//! Platform Detection
//!
//! Provides:
//! - the [`PlatformInfo`] descriptor and raw discovery payloads
//! - a `kube::Client` backed [`Discoverer`](crate::domain::ports::Discoverer)
//! - the detection algorithm ([`K8sBasedPlatformVersioner`])
//! - the OpenShift yes/no query

pub mod discovery;
pub mod info;
pub mod openshift;
pub mod versioner;

#[cfg(test)]
pub(crate) mod testing;

pub use discovery::*;
pub use info::*;
pub use openshift::*;
pub use versioner::*;
