//! Scriptorium client: the IO side of the upload/process/poll protocol.
mod engine;
mod filename;
mod persist;
mod preview;
mod service;
mod types;

pub use bytes::Bytes;
pub use engine::{ClientHandle, UploadSource};
pub use filename::sanitize_artifact_name;
pub use persist::{ensure_output_dir, ArtifactWriter, PersistError};
pub use preview::{classify_preview, PreviewKind};
pub use service::{ClientSettings, HttpJobService, JobService, UploadPart};
pub use types::{
    ClientEvent, CompiledDocEntry, JobStatus, PreviewPayload, ProcessedFileEntry, ServiceError,
    ServiceFailureKind, StatusReport, UploadAck,
};
