//! Scriptorium core: pure protocol state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, CompiledDocument, FileCandidate, JobResults, Phase, PickStats, PreviewKind,
    PreviewOutcome, PreviewState, ProcessedFile, SelectedFile, TaskId, ValidationPolicy,
};
pub use update::update;
pub use view_model::{
    format_size, AppViewModel, CompiledRowView, FileRowView, PreviewBody, PreviewView,
    ResultRowView,
};
