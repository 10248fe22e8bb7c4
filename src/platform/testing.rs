//! Deterministic discoverer for exercising every detection branch

use crate::domain::ports::Discoverer;
use crate::platform::OpenApiDocument;
use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroup, APIGroupList};
use k8s_openapi::apimachinery::pkg::version::Info;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) fn api_error() -> kube::Error {
    kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".into(),
        message: "oops".into(),
        reason: "InternalError".into(),
        code: 500,
    })
}

/// Each response left unset fails with [`api_error`]
#[derive(Default)]
pub(crate) struct MockDiscoverer {
    server_info: Option<Info>,
    groups: Option<APIGroupList>,
    doc: Option<OpenApiDocument>,
    cluster_version_body: Option<Vec<u8>>,
    version_calls: AtomicUsize,
    groups_calls: AtomicUsize,
    schema_calls: AtomicUsize,
    raw_paths: Mutex<Vec<String>>,
}

impl MockDiscoverer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_version(mut self, major: &str, minor: &str) -> Self {
        self.server_info = Some(Info {
            major: major.into(),
            minor: minor.into(),
            platform: "linux/amd64".into(),
            ..Default::default()
        });
        self
    }

    pub(crate) fn with_groups(mut self, names: &[&str]) -> Self {
        let groups = names
            .iter()
            .map(|name| APIGroup {
                name: name.to_string(),
                ..Default::default()
            })
            .collect();
        self.groups = Some(APIGroupList { groups });
        self
    }

    pub(crate) fn with_schema_version(mut self, version: &str) -> Self {
        self.doc = Some(OpenApiDocument::with_version(version));
        self
    }

    pub(crate) fn with_cluster_version_body(mut self, body: impl AsRef<[u8]>) -> Self {
        self.cluster_version_body = Some(body.as_ref().to_vec());
        self
    }

    pub(crate) fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn groups_calls(&self) -> usize {
        self.groups_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn raw_paths(&self) -> Vec<String> {
        self.raw_paths.lock().clone()
    }
}

#[async_trait]
impl Discoverer for MockDiscoverer {
    async fn server_version(&self) -> Result<Info, kube::Error> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        self.server_info.clone().ok_or_else(api_error)
    }

    async fn server_groups(&self) -> Result<APIGroupList, kube::Error> {
        self.groups_calls.fetch_add(1, Ordering::SeqCst);
        self.groups.clone().ok_or_else(api_error)
    }

    async fn openapi_schema(&self) -> Result<OpenApiDocument, kube::Error> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.doc.clone().ok_or_else(api_error)
    }

    async fn raw_get(&self, path: &str) -> Result<Vec<u8>, kube::Error> {
        self.raw_paths.lock().push(path.to_string());
        self.cluster_version_body.clone().ok_or_else(api_error)
    }
}
