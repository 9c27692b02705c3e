/// How a result artifact should be presented when previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Office formats are not rendered in place; a placeholder is shown.
    OfficeDocument,
    /// Portable documents render inline.
    PortableDocument,
    /// Everything else falls back to a "not previewable" notice.
    Unsupported,
}

/// Classify by filename suffix, matching literally the way the artifact
/// names are generated by the server (lowercase extensions).
pub fn classify_preview(file_name: &str) -> PreviewKind {
    if file_name.ends_with(".docx") {
        PreviewKind::OfficeDocument
    } else if file_name.ends_with(".pdf") {
        PreviewKind::PortableDocument
    } else {
        PreviewKind::Unsupported
    }
}
