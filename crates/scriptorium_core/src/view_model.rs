use crate::{Phase, PickStats};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub pending: Vec<FileRowView>,
    pub last_pick: Option<PickStats>,
    pub process_enabled: bool,
    pub retry_available: bool,
    pub progress: u8,
    pub message: String,
    pub results: Vec<ResultRowView>,
    pub compiled: Option<CompiledRowView>,
    pub preview: Option<PreviewView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub original_name: String,
    pub processed_name: Option<String>,
    pub download_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRowView {
    pub name: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub file_name: String,
    pub body: PreviewBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    Loading,
    /// Office formats are not rendered in place; a static notice is shown.
    PlaceholderNotice,
    InlineDocument { byte_len: u64 },
    NotPreviewable,
    Error(String),
}

/// Human-readable size for selection rows: bytes under 1 KB, then one
/// decimal of KB or MB.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1_048_576 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    }
}
