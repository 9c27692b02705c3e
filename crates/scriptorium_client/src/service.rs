use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;

use crate::{ServiceError, ServiceFailureKind, StatusReport, UploadAck};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Fixed delay between status polls.
    pub poll_interval: Duration,
    /// Cap on preview/download payloads, matching the service's own
    /// upload limit.
    pub max_artifact_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
            max_artifact_bytes: 16 * 1024 * 1024,
        }
    }
}

/// One file of a multipart upload batch.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The HTTP contract of the document-processing backend.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// POST all files as one multipart batch; returns the task identifier.
    async fn upload(&self, parts: Vec<UploadPart>) -> Result<String, ServiceError>;
    /// Ask the server to start processing the uploaded batch.
    async fn start(&self, task_id: &str) -> Result<(), ServiceError>;
    /// One status poll.
    async fn status(&self, task_id: &str) -> Result<StatusReport, ServiceError>;
    /// Fetch a preview blob for a result artifact.
    async fn preview(&self, file_name: &str) -> Result<Bytes, ServiceError>;
    /// Fetch a result artifact for local persistence.
    async fn download(&self, file_name: &str) -> Result<Bytes, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpJobService {
    base: reqwest::Url,
    client: reqwest::Client,
    max_artifact_bytes: u64,
}

impl HttpJobService {
    pub fn new(settings: &ClientSettings) -> Result<Self, ServiceError> {
        let base = reqwest::Url::parse(&settings.base_url)
            .map_err(|err| ServiceError::new(ServiceFailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(ServiceFailureKind::Network, err.to_string()))?;
        Ok(Self {
            base,
            client,
            max_artifact_bytes: settings.max_artifact_bytes,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, ServiceError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ServiceError::new(ServiceFailureKind::InvalidUrl, "base url cannot be a base")
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// GET a binary payload, streaming with a size cap.
    async fn fetch_blob(&self, segments: &[&str]) -> Result<Bytes, ServiceError> {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                ServiceFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_artifact_bytes {
                return Err(ServiceError::new(
                    ServiceFailureKind::TooLarge {
                        max_bytes: self.max_artifact_bytes,
                        actual: Some(content_len),
                    },
                    "artifact too large",
                ));
            }
        }

        let mut buf = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = buf.len() as u64 + chunk.len() as u64;
            if next_len > self.max_artifact_bytes {
                return Err(ServiceError::new(
                    ServiceFailureKind::TooLarge {
                        max_bytes: self.max_artifact_bytes,
                        actual: Some(next_len),
                    },
                    "artifact too large",
                ));
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

#[async_trait::async_trait]
impl JobService for HttpJobService {
    async fn upload(&self, parts: Vec<UploadPart>) -> Result<String, ServiceError> {
        let url = self.endpoint(&["upload"])?;
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            let file_part = reqwest::multipart::Part::bytes(part.bytes).file_name(part.file_name);
            // Field name repeated per file, as the backend expects.
            form = form.part("files[]", file_part);
        }

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                ServiceFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let ack: UploadAck = response.json().await.map_err(|err| {
            ServiceError::new(ServiceFailureKind::MalformedResponse, err.to_string())
        })?;
        Ok(ack.task_id)
    }

    async fn start(&self, task_id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&["process", task_id])?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                ServiceFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        // The ack body is opaque; it only has to be JSON.
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| {
                ServiceError::new(ServiceFailureKind::MalformedResponse, err.to_string())
            })?;
        Ok(())
    }

    async fn status(&self, task_id: &str) -> Result<StatusReport, ServiceError> {
        let url = self.endpoint(&["status", task_id])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                ServiceFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response.json::<StatusReport>().await.map_err(|err| {
            ServiceError::new(ServiceFailureKind::MalformedResponse, err.to_string())
        })
    }

    async fn preview(&self, file_name: &str) -> Result<Bytes, ServiceError> {
        self.fetch_blob(&["preview", file_name]).await
    }

    async fn download(&self, file_name: &str) -> Result<Bytes, ServiceError> {
        self.fetch_blob(&["download", file_name]).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(ServiceFailureKind::Timeout, err.to_string());
    }
    ServiceError::new(ServiceFailureKind::Network, err.to_string())
}
