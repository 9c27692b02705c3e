use scriptorium_core::{AppViewModel, Phase, PreviewBody};

/// Terminal projection of the view model. Pure so it can be tested
/// without capturing stdout.
pub fn render_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    match view.phase {
        Phase::Idle => {
            for row in &view.pending {
                lines.push(format!("  {} ({})", row.name, row.size));
            }
            if let Some(stats) = view.last_pick {
                if stats.rejected > 0 {
                    lines.push(format!(
                        "{} file(s) were skipped. Only DOCX files are supported.",
                        stats.rejected
                    ));
                }
            }
        }
        Phase::Uploading | Phase::Starting | Phase::Processing => {
            lines.push(format!(
                "[{}] {:3}% {}",
                progress_bar(view.progress),
                view.progress,
                view.message
            ));
        }
        Phase::Completed => {
            lines.push(view.message.clone());
            for row in &view.results {
                match (&row.processed_name, &row.error) {
                    (Some(processed), _) => {
                        lines.push(format!("  {} -> {}", row.original_name, processed));
                    }
                    (None, Some(error)) => {
                        lines.push(format!("  {}: failed ({error})", row.original_name));
                    }
                    (None, None) => {
                        lines.push(format!("  {}: no artifact", row.original_name));
                    }
                }
            }
            if let Some(compiled) = &view.compiled {
                lines.push(format!("  compiled document: {}", compiled.name));
            }
            if let Some(preview) = &view.preview {
                lines.push(preview_line(&preview.file_name, &preview.body));
            }
        }
        Phase::Error => {
            lines.push(format!("Error: {}", view.message));
            if view.retry_available {
                lines.push("A retry replays the whole sequence from upload.".to_string());
            }
        }
    }
    lines
}

pub fn print_view(view: &AppViewModel) {
    for line in render_lines(view) {
        println!("{line}");
    }
}

fn progress_bar(progress: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(progress.min(100)) * WIDTH / 100;
    let mut bar = String::with_capacity(WIDTH);
    for i in 0..WIDTH {
        bar.push(if i < filled { '#' } else { '.' });
    }
    bar
}

fn preview_line(file_name: &str, body: &PreviewBody) -> String {
    match body {
        PreviewBody::Loading => format!("  preview {file_name}: loading..."),
        PreviewBody::PlaceholderNotice => format!(
            "  preview {file_name}: DOCX preview is not available; download the file to view it."
        ),
        PreviewBody::InlineDocument { byte_len } => {
            format!("  preview {file_name}: renders inline ({byte_len} bytes)")
        }
        PreviewBody::NotPreviewable => {
            format!("  preview {file_name}: preview not available for this file type.")
        }
        PreviewBody::Error(message) => format!("  preview {file_name}: {message}"),
    }
}
