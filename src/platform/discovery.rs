//! Kubernetes Discoverer Adapter
//!
//! Implements the [`Discoverer`] port on top of a live `kube::Client`.

use crate::domain::ports::Discoverer;
use crate::platform::OpenApiDocument;
use async_trait::async_trait;
use hyper::Body;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIGroupList;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::error::ErrorResponse;
use kube::{Client, Config};
use tracing::debug;

/// Path of the aggregated OpenAPI v2 document
pub const OPENAPI_V2_PATH: &str = "/openapi/v2";

/// Discoverer backed by a `kube::Client`
#[derive(Clone)]
pub struct KubeDiscoverer {
    client: Client,
}

impl KubeDiscoverer {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from a connection configuration
    pub fn try_from_config(config: Config) -> Result<Self, kube::Error> {
        Client::try_from(config).map(Self::new)
    }
}

#[async_trait]
impl Discoverer for KubeDiscoverer {
    async fn server_version(&self) -> Result<Info, kube::Error> {
        debug!("Fetching server version");
        self.client.apiserver_version().await
    }

    async fn server_groups(&self) -> Result<APIGroupList, kube::Error> {
        debug!("Fetching server API groups");
        self.client.list_api_groups().await
    }

    async fn openapi_schema(&self) -> Result<OpenApiDocument, kube::Error> {
        debug!("Fetching OpenAPI schema from {}", OPENAPI_V2_PATH);
        let request = get_request(OPENAPI_V2_PATH)?;
        self.client.request::<OpenApiDocument>(request).await
    }

    /// The body is returned undecoded; non-2xx responses become `kube::Error::Api`
    async fn raw_get(&self, path: &str) -> Result<Vec<u8>, kube::Error> {
        let path = absolute_path(path);
        debug!("Issuing raw GET against {}", path);
        let request = get_request(&path)?.map(Body::from);

        let response = self.client.send(request).await?;
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(kube::Error::HyperError)?;

        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorResponse>(&body).unwrap_or_else(|_| ErrorResponse {
                status: "Failure".to_string(),
                message: String::from_utf8_lossy(&body).into_owned(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                code: status.as_u16(),
            });
            return Err(kube::Error::Api(error));
        }

        Ok(body.to_vec())
    }
}

fn get_request(path: &str) -> Result<http::Request<Vec<u8>>, kube::Error> {
    http::Request::get(path)
        .body(Vec::new())
        .map_err(kube::Error::HttpError)
}

/// API paths are rooted at the server; callers may omit the leading slash
fn absolute_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
