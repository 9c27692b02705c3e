#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a batch of candidate files (file picker or drop).
    FilesPicked(Vec<crate::FileCandidate>),
    /// User removed one entry from the pending set.
    FileRemoved { index: usize },
    /// User triggered upload-and-process for the pending set.
    ProcessClicked,
    /// Upload finished; the server assigned a task identifier.
    UploadCompleted { task_id: crate::TaskId },
    /// Upload failed (network error or non-2xx).
    UploadFailed { message: String },
    /// Start-processing call was acknowledged.
    StartCompleted,
    /// Start-processing call failed.
    StartFailed { message: String },
    /// Non-terminal poll response.
    StatusReported { progress: u8, message: String },
    /// Terminal poll response: the job completed with results.
    JobCompleted {
        files: Vec<crate::ProcessedFile>,
        compiled: Option<crate::CompiledDocument>,
    },
    /// Terminal poll response: the server reported the job as failed.
    JobFailed { message: String },
    /// User asked to replay the full upload/start sequence after an error.
    RetryClicked,
    /// User chose "process more": clear all per-job state.
    ResetClicked,
    /// User asked to preview a result artifact.
    PreviewRequested { file_name: String },
    /// Preview blob arrived and was classified.
    PreviewLoaded {
        file_name: String,
        kind: crate::PreviewKind,
        byte_len: u64,
    },
    /// Preview fetch failed; does not affect the job.
    PreviewFailed { file_name: String, message: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
