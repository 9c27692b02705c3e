use std::fmt;

use bytes::Bytes;
use serde::Deserialize;

use crate::preview::PreviewKind;

/// Response body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadAck {
    pub task_id: String,
}

/// Server-reported job status.
///
/// `uploaded` is what a poll sees when it races the start call; it is
/// non-terminal and handled like `processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Uploaded,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// One entry of the `processed_files` result payload. The server emits
/// either the processed/download pair or an `error` field per input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessedFileEntry {
    pub original_name: String,
    #[serde(default)]
    pub processed_name: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompiledDocEntry {
    pub name: String,
    pub download_url: String,
}

/// Response body of `GET /status/{task_id}`. Unknown fields are ignored;
/// the server includes bookkeeping the client has no use for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub processed_files: Option<Vec<ProcessedFileEntry>>,
    #[serde(default)]
    pub compiled_doc: Option<CompiledDocEntry>,
}

/// A fetched preview blob together with its presentation classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPayload {
    pub kind: PreviewKind,
    pub bytes: Bytes,
}

impl PreviewPayload {
    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Events emitted by the engine back to the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    UploadDone {
        result: Result<String, ServiceError>,
    },
    StartDone {
        task_id: String,
        result: Result<(), ServiceError>,
    },
    StatusTick(StatusReport),
    PreviewDone {
        file_name: String,
        result: Result<PreviewPayload, ServiceError>,
    },
    DownloadDone {
        file_name: String,
        result: Result<Bytes, ServiceError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceFailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: ServiceFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceFailureKind {
    InvalidUrl,
    Timeout,
    HttpStatus(u16),
    MalformedResponse,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
    Network,
}

impl fmt::Display for ServiceFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceFailureKind::InvalidUrl => write!(f, "invalid url"),
            ServiceFailureKind::Timeout => write!(f, "timeout"),
            ServiceFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ServiceFailureKind::MalformedResponse => write!(f, "malformed response"),
            ServiceFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "artifact too large (max {max_bytes}, actual {actual:?})")
            }
            ServiceFailureKind::Io => write!(f, "io error"),
            ServiceFailureKind::Network => write!(f, "network error"),
        }
    }
}
