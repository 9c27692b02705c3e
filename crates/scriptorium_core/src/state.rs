use crate::view_model::{
    format_size, AppViewModel, CompiledRowView, FileRowView, PreviewBody, PreviewView,
    ResultRowView,
};

/// Opaque server-assigned identifier for one submitted batch.
pub type TaskId = String;

/// Lifecycle of the single session-scoped job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Starting,
    Processing,
    Completed,
    Error,
}

/// A file offered for selection, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Source locator the IO layer can read the bytes from.
    pub path: String,
    pub name: String,
    pub size_bytes: u64,
}

/// A validated member of the pending set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub name: String,
    pub size_bytes: u64,
}

/// Filename acceptance predicate for the pending set.
///
/// Matches a literal suffix by default; `ignore_suffix_case` relaxes it
/// to an ASCII case-insensitive comparison, the way the backend itself
/// validates uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub suffix: String,
    pub ignore_suffix_case: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            suffix: ".docx".to_string(),
            ignore_suffix_case: false,
        }
    }
}

impl ValidationPolicy {
    pub fn accepts(&self, name: &str) -> bool {
        if self.ignore_suffix_case {
            name.len() >= self.suffix.len()
                && name
                    .get(name.len() - self.suffix.len()..)
                    .is_some_and(|tail| tail.eq_ignore_ascii_case(&self.suffix))
        } else {
            name.ends_with(&self.suffix)
        }
    }
}

/// Summary of the most recent selection batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// One entry of a completed job's result payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedFile {
    /// The server produced an artifact for this input.
    Ready {
        original_name: String,
        processed_name: String,
        download_url: String,
    },
    /// The server reported a per-file failure; no artifact exists.
    Failed { original_name: String, error: String },
}

impl ProcessedFile {
    pub fn original_name(&self) -> &str {
        match self {
            ProcessedFile::Ready { original_name, .. }
            | ProcessedFile::Failed { original_name, .. } => original_name,
        }
    }

    pub fn processed_name(&self) -> Option<&str> {
        match self {
            ProcessedFile::Ready { processed_name, .. } => Some(processed_name),
            ProcessedFile::Failed { .. } => None,
        }
    }
}

/// Optional merged artifact combining all processed files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocument {
    pub name: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobResults {
    pub files: Vec<ProcessedFile>,
    pub compiled: Option<CompiledDocument>,
}

/// How a fetched preview blob should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Office formats get a static placeholder notice.
    OfficeDocument,
    /// Portable documents render inline.
    PortableDocument,
    /// Anything else is not previewable.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Loading,
    Ready { kind: PreviewKind, byte_len: u64 },
    Failed(String),
}

/// At most one preview is open at a time; requesting another replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewState {
    pub file_name: String,
    pub outcome: PreviewOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    policy: ValidationPolicy,
    phase: Phase,
    pending: Vec<SelectedFile>,
    last_pick: Option<PickStats>,
    task_id: Option<TaskId>,
    progress: u8,
    message: String,
    results: Option<JobResults>,
    preview: Option<PreviewState>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Pure projection of the state for rendering.
    pub fn view(&self) -> AppViewModel {
        let pending = self
            .pending
            .iter()
            .map(|file| FileRowView {
                name: file.name.clone(),
                size: format_size(file.size_bytes),
            })
            .collect();

        let (results, compiled) = match &self.results {
            Some(results) => {
                let rows = results
                    .files
                    .iter()
                    .map(|file| match file {
                        ProcessedFile::Ready {
                            original_name,
                            processed_name,
                            download_url,
                        } => ResultRowView {
                            original_name: original_name.clone(),
                            processed_name: Some(processed_name.clone()),
                            download_url: Some(download_url.clone()),
                            error: None,
                        },
                        ProcessedFile::Failed {
                            original_name,
                            error,
                        } => ResultRowView {
                            original_name: original_name.clone(),
                            processed_name: None,
                            download_url: None,
                            error: Some(error.clone()),
                        },
                    })
                    .collect();
                let compiled = results.compiled.as_ref().map(|doc| CompiledRowView {
                    name: doc.name.clone(),
                    download_url: doc.download_url.clone(),
                });
                (rows, compiled)
            }
            None => (Vec::new(), None),
        };

        let preview = self.preview.as_ref().map(|preview| PreviewView {
            file_name: preview.file_name.clone(),
            body: match &preview.outcome {
                PreviewOutcome::Loading => PreviewBody::Loading,
                PreviewOutcome::Ready {
                    kind: PreviewKind::OfficeDocument,
                    ..
                } => PreviewBody::PlaceholderNotice,
                PreviewOutcome::Ready {
                    kind: PreviewKind::PortableDocument,
                    byte_len,
                } => PreviewBody::InlineDocument {
                    byte_len: *byte_len,
                },
                PreviewOutcome::Ready {
                    kind: PreviewKind::Unsupported,
                    ..
                } => PreviewBody::NotPreviewable,
                PreviewOutcome::Failed(message) => PreviewBody::Error(message.clone()),
            },
        });

        AppViewModel {
            phase: self.phase,
            pending,
            last_pick: self.last_pick,
            process_enabled: self.phase == Phase::Idle && !self.pending.is_empty(),
            retry_available: self.phase == Phase::Error && !self.pending.is_empty(),
            progress: self.progress,
            message: self.message.clone(),
            results,
            compiled,
            preview,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn add_candidates(&mut self, candidates: Vec<FileCandidate>) -> PickStats {
        let mut stats = PickStats::default();
        for candidate in candidates {
            if self.policy.accepts(&candidate.name) {
                // Duplicate filenames are kept; reprocessing the same
                // name is allowed.
                self.pending.push(SelectedFile {
                    path: candidate.path,
                    name: candidate.name,
                    size_bytes: candidate.size_bytes,
                });
                stats.accepted += 1;
            } else {
                stats.rejected += 1;
            }
        }
        self.last_pick = Some(stats);
        self.dirty = true;
        stats
    }

    pub(crate) fn remove_pending(&mut self, index: usize) -> bool {
        if index < self.pending.len() {
            self.pending.remove(index);
            self.dirty = true;
            true
        } else {
            false
        }
    }

    pub(crate) fn pending_files(&self) -> &[SelectedFile] {
        &self.pending
    }

    pub(crate) fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    pub(crate) fn begin_upload(&mut self) {
        self.phase = Phase::Uploading;
        self.progress = 5;
        self.message = "Uploading files...".to_string();
        self.task_id = None;
        self.results = None;
        self.preview = None;
        self.dirty = true;
    }

    pub(crate) fn record_upload(&mut self, task_id: TaskId) {
        self.phase = Phase::Starting;
        self.progress = 15;
        self.message = "Files uploaded successfully. Starting processing...".to_string();
        self.task_id = Some(task_id);
        self.dirty = true;
    }

    pub(crate) fn record_start(&mut self) {
        self.phase = Phase::Processing;
        self.message = "Processing started. This may take several minutes...".to_string();
        self.dirty = true;
    }

    pub(crate) fn apply_status(&mut self, progress: u8, message: String) {
        self.progress = progress.min(100);
        self.message = message;
        self.dirty = true;
    }

    pub(crate) fn complete(&mut self, results: JobResults) {
        self.phase = Phase::Completed;
        self.progress = 100;
        self.message = "Processing completed".to_string();
        self.results = Some(results);
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = Phase::Error;
        self.progress = 0;
        self.message = message;
        self.dirty = true;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self {
            policy: self.policy.clone(),
            dirty: true,
            ..Self::default()
        };
    }

    /// True when the name belongs to a downloadable result artifact.
    pub(crate) fn has_artifact(&self, file_name: &str) -> bool {
        let Some(results) = &self.results else {
            return false;
        };
        results
            .files
            .iter()
            .any(|file| file.processed_name() == Some(file_name))
            || results
                .compiled
                .as_ref()
                .is_some_and(|doc| doc.name == file_name)
    }

    pub(crate) fn request_preview(&mut self, file_name: String) {
        self.preview = Some(PreviewState {
            file_name,
            outcome: PreviewOutcome::Loading,
        });
        self.dirty = true;
    }

    pub(crate) fn resolve_preview(&mut self, file_name: &str, outcome: PreviewOutcome) -> bool {
        match &mut self.preview {
            Some(preview)
                if preview.file_name == file_name
                    && preview.outcome == PreviewOutcome::Loading =>
            {
                preview.outcome = outcome;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }
}
