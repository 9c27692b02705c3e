use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use client_logging::client_warn;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::preview::classify_preview;
use crate::service::{ClientSettings, HttpJobService, JobService, UploadPart};
use crate::types::{ClientEvent, PreviewPayload, ServiceError, ServiceFailureKind};

/// A file queued for upload: where to read it and the name the server sees.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub path: String,
    pub file_name: String,
}

enum ClientCommand {
    Upload { sources: Vec<UploadSource> },
    StartProcessing { task_id: String },
    Poll { task_id: String },
    CancelJob,
    FetchPreview { file_name: String },
    Download { file_name: String },
}

/// Handle to the IO engine. Commands are fire-and-forget; outcomes come
/// back as [`ClientEvent`]s through [`ClientHandle::try_recv`].
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: Mutex<mpsc::Receiver<ClientEvent>>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let poll_interval = settings.poll_interval;
        let service = Arc::new(HttpJobService::new(&settings)?);
        Ok(Self::with_service(service, poll_interval))
    }

    /// Engine over an arbitrary service implementation.
    pub fn with_service(service: Arc<dyn JobService>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut job_token = CancellationToken::new();
            let mut poll_token = job_token.child_token();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    ClientCommand::Upload { sources } => {
                        // A new submission abandons everything from the
                        // previous one, including its poll loop.
                        job_token.cancel();
                        job_token = CancellationToken::new();
                        poll_token = job_token.child_token();
                        runtime.spawn(run_upload(
                            service.clone(),
                            sources,
                            job_token.clone(),
                            event_tx.clone(),
                        ));
                    }
                    ClientCommand::StartProcessing { task_id } => {
                        runtime.spawn(run_start(
                            service.clone(),
                            task_id,
                            job_token.clone(),
                            event_tx.clone(),
                        ));
                    }
                    ClientCommand::Poll { task_id } => {
                        // Invariant: at most one polling loop is live.
                        poll_token.cancel();
                        poll_token = job_token.child_token();
                        runtime.spawn(run_poll(
                            service.clone(),
                            task_id,
                            poll_interval,
                            poll_token.clone(),
                            event_tx.clone(),
                        ));
                    }
                    ClientCommand::CancelJob => {
                        job_token.cancel();
                    }
                    ClientCommand::FetchPreview { file_name } => {
                        runtime.spawn(run_preview(
                            service.clone(),
                            file_name,
                            job_token.clone(),
                            event_tx.clone(),
                        ));
                    }
                    ClientCommand::Download { file_name } => {
                        runtime.spawn(run_download(
                            service.clone(),
                            file_name,
                            job_token.clone(),
                            event_tx.clone(),
                        ));
                    }
                }
            }
            // Handle dropped: abandon outstanding work before the runtime
            // shuts down.
            job_token.cancel();
        });

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        }
    }

    pub fn submit_upload(&self, sources: Vec<UploadSource>) {
        let _ = self.cmd_tx.send(ClientCommand::Upload { sources });
    }

    pub fn start_processing(&self, task_id: String) {
        let _ = self.cmd_tx.send(ClientCommand::StartProcessing { task_id });
    }

    pub fn poll(&self, task_id: String) {
        let _ = self.cmd_tx.send(ClientCommand::Poll { task_id });
    }

    /// Cancel the polling loop and any in-flight request of the current job.
    pub fn cancel_job(&self) {
        let _ = self.cmd_tx.send(ClientCommand::CancelJob);
    }

    pub fn fetch_preview(&self, file_name: String) {
        let _ = self.cmd_tx.send(ClientCommand::FetchPreview { file_name });
    }

    pub fn download(&self, file_name: String) {
        let _ = self.cmd_tx.send(ClientCommand::Download { file_name });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn run_upload(
    service: Arc<dyn JobService>,
    sources: Vec<UploadSource>,
    token: CancellationToken,
    events: mpsc::Sender<ClientEvent>,
) {
    let result = tokio::select! {
        _ = token.cancelled() => return,
        result = upload_batch(service.as_ref(), sources) => result,
    };
    let _ = events.send(ClientEvent::UploadDone { result });
}

async fn upload_batch(
    service: &dyn JobService,
    sources: Vec<UploadSource>,
) -> Result<String, ServiceError> {
    let mut parts = Vec::with_capacity(sources.len());
    for source in sources {
        let bytes = tokio::fs::read(&source.path).await.map_err(|err| {
            ServiceError::new(ServiceFailureKind::Io, format!("{}: {err}", source.path))
        })?;
        parts.push(UploadPart {
            file_name: source.file_name,
            bytes,
        });
    }
    service.upload(parts).await
}

async fn run_start(
    service: Arc<dyn JobService>,
    task_id: String,
    token: CancellationToken,
    events: mpsc::Sender<ClientEvent>,
) {
    let result = tokio::select! {
        _ = token.cancelled() => return,
        result = service.start(&task_id) => result,
    };
    let _ = events.send(ClientEvent::StartDone { task_id, result });
}

async fn run_poll(
    service: Arc<dyn JobService>,
    task_id: String,
    interval: Duration,
    token: CancellationToken,
    events: mpsc::Sender<ClientEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The interval's first tick resolves immediately; consume it so the
    // first request goes out one full interval after the start ack.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = service.status(&task_id) => result,
        };
        match result {
            Ok(report) => {
                let terminal = report.status.is_terminal();
                if events.send(ClientEvent::StatusTick(report)).is_err() {
                    break;
                }
                if terminal {
                    break;
                }
            }
            Err(err) => {
                // A dropped poll must not abort a long-running job.
                client_warn!("status poll failed for task {task_id}: {err}");
            }
        }
    }
}

async fn run_preview(
    service: Arc<dyn JobService>,
    file_name: String,
    token: CancellationToken,
    events: mpsc::Sender<ClientEvent>,
) {
    let result = tokio::select! {
        _ = token.cancelled() => return,
        result = service.preview(&file_name) => result,
    };
    let result = result.map(|bytes| PreviewPayload {
        kind: classify_preview(&file_name),
        bytes,
    });
    let _ = events.send(ClientEvent::PreviewDone { file_name, result });
}

async fn run_download(
    service: Arc<dyn JobService>,
    file_name: String,
    token: CancellationToken,
    events: mpsc::Sender<ClientEvent>,
) {
    let result = tokio::select! {
        _ = token.cancelled() => return,
        result = service.download(&file_name) => result,
    };
    let _ = events.send(ClientEvent::DownloadDone { file_name, result });
}
