//! Platform Versioner
//!
//! Answers one question about a cluster: is it vanilla Kubernetes or
//! OpenShift, and which versions does it run?
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │            detect_openshift / is_openshift (yes/no)          │
//! ├──────────────────────────────────────────────────────────────┤
//! │        K8sBasedPlatformVersioner  ──►  PlatformInfo          │
//! │   server version → API groups → OpenAPI schema → fallback    │
//! ├──────────────────────────────────────────────────────────────┤
//! │                    Discoverer (port)                         │
//! │   ┌──────────────────────┐    ┌──────────────────────────┐   │
//! │   │  KubeDiscoverer      │    │  injected test doubles   │   │
//! │   │  (kube::Client)      │    │                          │   │
//! │   └──────────────────────┘    └──────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`platform`]: Descriptor, detection algorithm and kube adapter
//! - [`domain`]: Port definitions
//! - [`error`]: Error types and handling

pub mod domain;
pub mod error;
pub mod platform;

// Re-export commonly used types
pub use domain::ports::{Discoverer, DiscovererRef, PlatformVersioner};

pub use error::{DetectionError, Error, Result};

pub use platform::{
    detect_openshift, is_openshift, ClusterVersionInfo, K8sBasedPlatformVersioner,
    KubeDiscoverer, OpenApiDocument, PlatformInfo, PlatformType, CLUSTER_VERSION_API_PATH,
    ROUTE_API_GROUP,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
