use crate::{AppState, Effect, JobResults, Msg, Phase, PreviewOutcome};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not fit the current phase are dropped without touching
/// state. That covers stale engine events from an abandoned job as well as
/// user actions the view would not offer in that phase.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked(candidates) => {
            if state.phase() != Phase::Idle || candidates.is_empty() {
                return (state, Vec::new());
            }
            state.add_candidates(candidates);
            Vec::new()
        }
        Msg::FileRemoved { index } => {
            if state.phase() == Phase::Idle {
                state.remove_pending(index);
            }
            Vec::new()
        }
        Msg::ProcessClicked => {
            // Invariant: one job per session; a running sequence blocks
            // new intake until reset.
            if state.phase() != Phase::Idle || state.pending_files().is_empty() {
                return (state, Vec::new());
            }
            state.begin_upload();
            vec![Effect::BeginUpload {
                files: state.pending_files().to_vec(),
            }]
        }
        Msg::UploadCompleted { task_id } => {
            if state.phase() != Phase::Uploading {
                return (state, Vec::new());
            }
            state.record_upload(task_id.clone());
            vec![Effect::BeginProcessing { task_id }]
        }
        Msg::UploadFailed { message } => {
            if state.phase() != Phase::Uploading {
                return (state, Vec::new());
            }
            state.fail(message);
            Vec::new()
        }
        Msg::StartCompleted => {
            let Some(task_id) = state.task_id().cloned() else {
                return (state, Vec::new());
            };
            if state.phase() != Phase::Starting {
                return (state, Vec::new());
            }
            state.record_start();
            vec![Effect::BeginPolling { task_id }]
        }
        Msg::StartFailed { message } => {
            if state.phase() != Phase::Starting {
                return (state, Vec::new());
            }
            state.fail(message);
            Vec::new()
        }
        Msg::StatusReported { progress, message } => {
            if state.phase() == Phase::Processing {
                state.apply_status(progress, message);
            }
            Vec::new()
        }
        Msg::JobCompleted { files, compiled } => {
            if state.phase() != Phase::Processing {
                return (state, Vec::new());
            }
            state.complete(JobResults { files, compiled });
            Vec::new()
        }
        Msg::JobFailed { message } => {
            if state.phase() != Phase::Processing {
                return (state, Vec::new());
            }
            state.fail(message);
            Vec::new()
        }
        Msg::RetryClicked => {
            // Full restart from upload with the unchanged pending set;
            // the sequence is never resumed from the failed step.
            if state.phase() != Phase::Error || state.pending_files().is_empty() {
                return (state, Vec::new());
            }
            state.begin_upload();
            vec![Effect::BeginUpload {
                files: state.pending_files().to_vec(),
            }]
        }
        Msg::ResetClicked => {
            if state.phase() == Phase::Idle {
                return (state, Vec::new());
            }
            state.reset();
            vec![Effect::CancelJob]
        }
        Msg::PreviewRequested { file_name } => {
            if state.phase() != Phase::Completed || !state.has_artifact(&file_name) {
                return (state, Vec::new());
            }
            state.request_preview(file_name.clone());
            vec![Effect::FetchPreview { file_name }]
        }
        Msg::PreviewLoaded {
            file_name,
            kind,
            byte_len,
        } => {
            state.resolve_preview(&file_name, PreviewOutcome::Ready { kind, byte_len });
            Vec::new()
        }
        Msg::PreviewFailed { file_name, message } => {
            state.resolve_preview(&file_name, PreviewOutcome::Failed(message));
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
