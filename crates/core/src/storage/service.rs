//! Storage service implementation over the Walrus HTTP API.

use std::future::Future;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use reqwest::{Request, Response, StatusCode, Url};
use tracing::{debug, error};
use walrus_relay_shared::WalrusAddress;

use super::config::StorageConfig;
use super::error::StorageError;
use super::response::{PublisherResponse, StoredBlob};

/// Filename attached to every outbound upload part.
pub const UPLOAD_FILE_NAME: &str = "upload.jpg";

/// Content type attached to every outbound upload part.
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// Multipart field name the publisher reads the blob from.
const UPLOAD_FIELD_NAME: &str = "file";

/// A fully buffered upload destined for one address.
#[derive(Debug, Clone)]
pub struct BlobUpload {
    /// Recipient of the stored blob object.
    pub address: WalrusAddress,
    /// File contents.
    pub data: Bytes,
}

/// Backend that stores and serves blobs.
///
/// Implemented by [`WalrusClient`]; tests may provide their own.
pub trait BlobStore: Send + Sync {
    /// Store a blob and return its identifier.
    fn store(
        &self,
        upload: BlobUpload,
    ) -> impl Future<Output = Result<StoredBlob, StorageError>> + Send;

    /// Read a blob's raw bytes.
    fn read(&self, blob_id: &str) -> impl Future<Output = Result<Bytes, StorageError>> + Send;
}

/// Client for a Walrus publisher and aggregator.
#[derive(Debug, Clone)]
pub struct WalrusClient {
    http: reqwest::Client,
    config: StorageConfig,
}

impl WalrusClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| StorageError::configuration(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Aggregator URL for a blob, with the id as a single encoded path segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregator URL cannot take path segments.
    pub fn blob_url(&self, blob_id: &str) -> Result<Url, StorageError> {
        let mut url = self.config.aggregator_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::configuration("aggregator URL cannot be a base"))?
            .pop_if_empty()
            .push(blob_id);
        Ok(url)
    }

    /// Builds the publisher PUT for an upload.
    ///
    /// The file goes out as a single `file` part named [`UPLOAD_FILE_NAME`]
    /// with type [`UPLOAD_CONTENT_TYPE`], whatever the client sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be assembled.
    pub fn upload_request(&self, upload: &BlobUpload) -> Result<Request, StorageError> {
        let part = Part::stream_with_length(upload.data.clone(), upload.data.len() as u64)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        Ok(self
            .http
            .put(self.config.publisher_url.clone())
            .query(&[
                ("epochs", self.config.epochs.to_string()),
                ("send_object_to", upload.address.to_string()),
            ])
            .multipart(form)
            .build()?)
    }

    async fn put_blob(&self, request: Request) -> Result<StoredBlob, StorageError> {
        let response = self.http.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body: capture_body(response).await,
            });
        }

        response
            .json::<PublisherResponse>()
            .await
            .map_err(|e| StorageError::malformed(e.to_string()))?
            .into_stored_blob()
    }
}

impl BlobStore for WalrusClient {
    async fn store(&self, upload: BlobUpload) -> Result<StoredBlob, StorageError> {
        let file_bytes = upload.data.len();
        let request = self.upload_request(&upload)?;
        let (content_type, payload_bytes) = payload_headers(request.headers());

        debug!(
            address = %upload.address,
            file_bytes,
            epochs = self.config.epochs,
            "Sending blob to Walrus publisher"
        );

        let result = self.put_blob(request).await;
        if let Err(err) = &result {
            error!(
                payload_bytes = ?payload_bytes,
                file_bytes,
                content_type = %content_type,
                kind = err.kind(),
                error = %err,
                backend_payload = ?err.backend_payload(),
                "Walrus publisher rejected upload"
            );
        }
        result
    }

    async fn read(&self, blob_id: &str) -> Result<Bytes, StorageError> {
        let url = self.blob_url(blob_id)?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::not_found(blob_id));
        }
        if !status.is_success() {
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body: capture_body(response).await,
            });
        }

        Ok(response.bytes().await?)
    }
}

/// Content type and declared length of an outbound multipart body.
fn payload_headers(headers: &HeaderMap) -> (String, Option<u64>) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    (content_type, length)
}

/// Read an error body as JSON, falling back to text. Empty bodies yield `None`.
async fn capture_body(response: Response) -> Option<serde_json::Value> {
    let bytes = response.bytes().await.ok()?;
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(&bytes).ok().or_else(|| {
        Some(serde_json::Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::storage::BlobStatus;

    const ADDRESS: &str = "0x1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f809";

    fn client_for(server: &MockServer) -> WalrusClient {
        let config = StorageConfig::new(
            &format!("{}/v1/blobs", server.uri()),
            &format!("{}/v1/blobs", server.uri()),
        )
        .expect("valid urls");
        WalrusClient::from_config(config).expect("client")
    }

    fn upload(data: &'static [u8]) -> BlobUpload {
        BlobUpload {
            address: WalrusAddress::parse(ADDRESS).expect("valid address"),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_blob_url_encodes_segment() {
        let config = StorageConfig::new(
            "https://publisher.example.com/v1/blobs",
            "https://aggregator.example.com/v1/blobs/",
        )
        .expect("valid urls");
        let client = WalrusClient::from_config(config).expect("client");

        assert_eq!(
            client.blob_url("abc").expect("url").as_str(),
            "https://aggregator.example.com/v1/blobs/abc"
        );
        assert_eq!(
            client.blob_url("a b/../c").expect("url").as_str(),
            "https://aggregator.example.com/v1/blobs/a%20b%2F..%2Fc"
        );
    }

    #[tokio::test]
    async fn test_upload_request_declares_payload_length() {
        let config = StorageConfig::new(
            "https://publisher.example.com/v1/blobs",
            "https://aggregator.example.com/v1/blobs",
        )
        .expect("valid urls");
        let client = WalrusClient::from_config(config).expect("client");
        let data = b"twenty-four bytes of jpg";

        let request = client.upload_request(&upload(data)).expect("request");
        let (content_type, payload_bytes) = payload_headers(request.headers());

        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let boundary = content_type.trim_start_matches("multipart/form-data; boundary=");
        let payload_bytes = payload_bytes.expect("content-length");
        // Framing: opening and closing delimiters plus the part headers.
        assert!(payload_bytes > (data.len() + 2 * boundary.len()) as u64);
        assert_eq!(request.method(), reqwest::Method::PUT);
        assert_eq!(
            request.url().query(),
            Some(format!("epochs=5&send_object_to={ADDRESS}").as_str())
        );
    }

    #[tokio::test]
    async fn test_store_newly_created() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/blobs"))
            .and(query_param("epochs", "5"))
            .and(query_param("send_object_to", ADDRESS))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(header_regex("content-length", "^[0-9]+$"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"upload.jpg\""))
            .and(body_string_contains("image/jpeg"))
            .and(body_string_contains("hello walrus"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "newlyCreated": { "blobObject": { "blobId": "X" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let stored = client_for(&server)
            .store(upload(b"hello walrus"))
            .await
            .expect("stored");
        assert_eq!(stored.blob_id.as_str(), "X");
        assert_eq!(stored.status, BlobStatus::NewlyCreated);
    }

    #[tokio::test]
    async fn test_store_already_certified() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "alreadyCertified": { "blobId": "Y", "endEpoch": 40 }
            })))
            .mount(&server)
            .await;

        let stored = client_for(&server)
            .store(upload(b"again"))
            .await
            .expect("stored");
        assert_eq!(stored.blob_id.as_str(), "Y");
        assert_eq!(stored.status, BlobStatus::AlreadyCertified);
    }

    #[tokio::test]
    async fn test_store_uses_configured_epochs() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(query_param("epochs", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "alreadyCertified": { "blobId": "Z" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = StorageConfig::new(&server.uri(), &server.uri())
            .expect("valid urls")
            .with_epochs(12);
        let client = WalrusClient::from_config(config).expect("client");
        let stored = client.store(upload(b"x")).await.expect("stored");
        assert_eq!(stored.blob_id.as_str(), "Z");
    }

    #[tokio::test]
    async fn test_store_rejected_with_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "invalid epochs" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .store(upload(b"data"))
            .await
            .unwrap_err();
        match err {
            StorageError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(
                    body,
                    Some(json!({ "error": { "code": 400, "message": "invalid epochs" } }))
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_rejected_with_text_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .store(upload(b"data"))
            .await
            .unwrap_err();
        assert_eq!(err.backend_payload(), Some(&json!("bad gateway")));
    }

    #[tokio::test]
    async fn test_store_rejected_without_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .store(upload(b"data"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Rejected {
                status: 500,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn test_store_unexpected_shape_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .store(upload(b"data"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_store_unreachable_backend_is_transport() {
        // Port 9 (discard) is not expected to be listening locally.
        let config = StorageConfig::new("http://127.0.0.1:9/v1/blobs", "http://127.0.0.1:9/v1/blobs")
            .expect("valid urls");
        let client = WalrusClient::from_config(config).expect("client");

        let err = client.store(upload(b"data")).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn test_read_returns_exact_bytes() {
        let server = MockServer::start().await;
        let payload: Vec<u8> = (0..=255u8).collect();
        Mock::given(method("GET"))
            .and(path("/v1/blobs/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = client_for(&server).read("abc").await.expect("bytes");
        assert_eq!(bytes.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn test_read_missing_blob() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("blob not found"))
            .mount(&server)
            .await;

        let err = client_for(&server).read("missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { ref blob_id } if blob_id == "missing"));
    }

    #[tokio::test]
    async fn test_read_server_error_kept_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).read("abc").await.unwrap_err();
        assert!(matches!(err, StorageError::Rejected { status: 503, .. }));
    }
}
