use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::client_info;
use scriptorium_client::{
    Bytes, ClientEvent, ClientHandle, ClientSettings, JobStatus, ProcessedFileEntry, ServiceError,
    StatusReport, UploadSource,
};
use scriptorium_core::{CompiledDocument, Effect, Msg, PreviewKind, ProcessedFile};

/// Messages of the app event loop: protocol messages for the core state
/// machine plus app-local download completions.
#[derive(Debug)]
pub enum AppMsg {
    Core(Msg),
    Download {
        file_name: String,
        result: Result<Bytes, ServiceError>,
    },
}

pub struct EffectRunner {
    handle: Arc<ClientHandle>,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        Ok(Self {
            handle: Arc::new(ClientHandle::new(settings)?),
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::BeginUpload { files } => {
                    client_info!("BeginUpload count={}", files.len());
                    let sources = files
                        .into_iter()
                        .map(|file| UploadSource {
                            path: file.path,
                            file_name: file.name,
                        })
                        .collect();
                    self.handle.submit_upload(sources);
                }
                Effect::BeginProcessing { task_id } => {
                    client_info!("BeginProcessing task_id={task_id}");
                    self.handle.start_processing(task_id);
                }
                Effect::BeginPolling { task_id } => {
                    client_info!("BeginPolling task_id={task_id}");
                    self.handle.poll(task_id);
                }
                Effect::CancelJob => {
                    self.handle.cancel_job();
                }
                Effect::FetchPreview { file_name } => {
                    self.handle.fetch_preview(file_name);
                }
            }
        }
    }

    pub fn download(&self, file_name: &str) {
        self.handle.download(file_name.to_string());
    }

    pub fn spawn_event_pump(&self, msg_tx: mpsc::Sender<AppMsg>) {
        let handle = self.handle.clone();
        thread::spawn(move || loop {
            if let Some(event) = handle.try_recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: ClientEvent) -> AppMsg {
    match event {
        ClientEvent::UploadDone { result } => AppMsg::Core(match result {
            Ok(task_id) => Msg::UploadCompleted { task_id },
            Err(err) => Msg::UploadFailed {
                message: err.to_string(),
            },
        }),
        ClientEvent::StartDone { result, .. } => AppMsg::Core(match result {
            Ok(()) => Msg::StartCompleted,
            Err(err) => Msg::StartFailed {
                message: err.to_string(),
            },
        }),
        ClientEvent::StatusTick(report) => AppMsg::Core(map_status(report)),
        ClientEvent::PreviewDone { file_name, result } => AppMsg::Core(match result {
            Ok(payload) => Msg::PreviewLoaded {
                file_name,
                kind: map_preview_kind(payload.kind),
                byte_len: payload.byte_len(),
            },
            Err(err) => Msg::PreviewFailed {
                file_name,
                message: err.to_string(),
            },
        }),
        ClientEvent::DownloadDone { file_name, result } => AppMsg::Download { file_name, result },
    }
}

fn map_status(report: StatusReport) -> Msg {
    match report.status {
        JobStatus::Completed => Msg::JobCompleted {
            files: report
                .processed_files
                .unwrap_or_default()
                .into_iter()
                .map(map_entry)
                .collect(),
            compiled: report.compiled_doc.map(|doc| CompiledDocument {
                name: doc.name,
                download_url: doc.download_url,
            }),
        },
        JobStatus::Error => Msg::JobFailed {
            message: report.message,
        },
        // `uploaded` can race the start ack; both are plain progress.
        JobStatus::Uploaded | JobStatus::Processing => Msg::StatusReported {
            progress: report.progress,
            message: report.message,
        },
    }
}

fn map_entry(entry: ProcessedFileEntry) -> ProcessedFile {
    let ProcessedFileEntry {
        original_name,
        processed_name,
        download_url,
        error,
    } = entry;
    match (processed_name, download_url, error) {
        (Some(processed_name), Some(download_url), None) => ProcessedFile::Ready {
            original_name,
            processed_name,
            download_url,
        },
        (_, _, error) => ProcessedFile::Failed {
            original_name,
            error: error.unwrap_or_else(|| "processing failed".to_string()),
        },
    }
}

fn map_preview_kind(kind: scriptorium_client::PreviewKind) -> PreviewKind {
    match kind {
        scriptorium_client::PreviewKind::OfficeDocument => PreviewKind::OfficeDocument,
        scriptorium_client::PreviewKind::PortableDocument => PreviewKind::PortableDocument,
        scriptorium_client::PreviewKind::Unsupported => PreviewKind::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::{map_entry, map_status};
    use scriptorium_client::{CompiledDocEntry, JobStatus, ProcessedFileEntry, StatusReport};
    use scriptorium_core::{Msg, ProcessedFile};

    fn entry(
        original: &str,
        processed: Option<&str>,
        url: Option<&str>,
        error: Option<&str>,
    ) -> ProcessedFileEntry {
        ProcessedFileEntry {
            original_name: original.to_string(),
            processed_name: processed.map(str::to_string),
            download_url: url.map(str::to_string),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn complete_entry_maps_to_ready() {
        let mapped = map_entry(entry(
            "a.docx",
            Some("processed_a_1.docx"),
            Some("/download/processed_a_1.docx"),
            None,
        ));
        assert!(matches!(mapped, ProcessedFile::Ready { .. }));
    }

    #[test]
    fn error_entry_maps_to_failed() {
        let mapped = map_entry(entry("a.docx", None, None, Some("boom")));
        match mapped {
            ProcessedFile::Failed { error, .. } => assert_eq!(error, "boom"),
            other => panic!("unexpected mapping {other:?}"),
        }
    }

    #[test]
    fn half_complete_entry_is_treated_as_failed() {
        // A processed name without a download URL is not actionable.
        let mapped = map_entry(entry("a.docx", Some("processed_a_1.docx"), None, None));
        assert!(matches!(mapped, ProcessedFile::Failed { .. }));
    }

    #[test]
    fn uploaded_status_is_plain_progress() {
        let msg = map_status(StatusReport {
            status: JobStatus::Uploaded,
            progress: 0,
            message: "Files uploaded".to_string(),
            processed_files: None,
            compiled_doc: None,
        });
        assert!(matches!(msg, Msg::StatusReported { progress: 0, .. }));
    }

    #[test]
    fn completed_status_carries_results() {
        let msg = map_status(StatusReport {
            status: JobStatus::Completed,
            progress: 100,
            message: "Processing completed".to_string(),
            processed_files: Some(vec![entry(
                "a.docx",
                Some("processed_a_1.docx"),
                Some("/download/processed_a_1.docx"),
                None,
            )]),
            compiled_doc: Some(CompiledDocEntry {
                name: "compiled_1.docx".to_string(),
                download_url: "/download/compiled_1.docx".to_string(),
            }),
        });
        match msg {
            Msg::JobCompleted { files, compiled } => {
                assert_eq!(files.len(), 1);
                assert_eq!(compiled.unwrap().name, "compiled_1.docx");
            }
            other => panic!("unexpected mapping {other:?}"),
        }
    }

    #[test]
    fn error_status_maps_to_job_failed() {
        let msg = map_status(StatusReport {
            status: JobStatus::Error,
            progress: 55,
            message: "Error: out of disk".to_string(),
            processed_files: None,
            compiled_doc: None,
        });
        match msg {
            Msg::JobFailed { message } => assert_eq!(message, "Error: out of disk"),
            other => panic!("unexpected mapping {other:?}"),
        }
    }
}
