#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the given files as one multipart batch.
    BeginUpload { files: Vec<crate::SelectedFile> },
    /// Ask the server to start processing the uploaded batch.
    BeginProcessing { task_id: crate::TaskId },
    /// Start the status polling loop for the running job.
    BeginPolling { task_id: crate::TaskId },
    /// Cancel the polling loop and any in-flight request for the job.
    CancelJob,
    /// Fetch a preview blob for one result artifact.
    FetchPreview { file_name: String },
}
