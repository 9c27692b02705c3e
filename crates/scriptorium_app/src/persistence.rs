use std::path::Path;

use chrono::Utc;
use client_logging::{client_error, client_info};
use scriptorium_client::ArtifactWriter;
use scriptorium_core::AppViewModel;
use serde::{Deserialize, Serialize};

const RECORD_FILENAME: &str = ".scriptorium_batch.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BatchRecord {
    completed_utc: String,
    artifacts: Vec<ArtifactRecord>,
    compiled: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArtifactRecord {
    original_name: String,
    processed_name: Option<String>,
    error: Option<String>,
}

/// Record the completed batch next to the downloaded artifacts. Failures
/// here are logged, never fatal; the artifacts themselves already exist.
pub fn save_batch_record(output_dir: &Path, view: &AppViewModel) {
    let record = BatchRecord {
        completed_utc: Utc::now().to_rfc3339(),
        artifacts: view
            .results
            .iter()
            .map(|row| ArtifactRecord {
                original_name: row.original_name.clone(),
                processed_name: row.processed_name.clone(),
                error: row.error.clone(),
            })
            .collect(),
        compiled: view.compiled.as_ref().map(|doc| doc.name.clone()),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&record, pretty) {
        Ok(text) => text,
        Err(err) => {
            client_error!("Failed to serialize batch record: {}", err);
            return;
        }
    };

    let writer = ArtifactWriter::new(output_dir.to_path_buf());
    match writer.write(RECORD_FILENAME, content.as_bytes()) {
        Ok(path) => client_info!("Recorded batch in {}", path.display()),
        Err(err) => client_error!("Failed to write batch record: {}", err),
    }
}
