use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use client_logging::client_warn;
use scriptorium_core::FileCandidate;

/// Expand CLI inputs into selection candidates: files are taken as-is,
/// directories contribute their immediate children. Validation against
/// the suffix policy happens in the state machine, not here.
pub fn gather_candidates(inputs: &[PathBuf]) -> Result<Vec<FileCandidate>> {
    let mut candidates = Vec::new();
    for input in inputs {
        let meta = fs::metadata(input)
            .with_context(|| format!("cannot read {}", input.display()))?;
        if meta.is_dir() {
            for entry in
                fs::read_dir(input).with_context(|| format!("cannot list {}", input.display()))?
            {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    push_candidate(&mut candidates, &entry.path(), entry.metadata()?.len());
                }
            }
        } else {
            push_candidate(&mut candidates, input, meta.len());
        }
    }
    Ok(candidates)
}

fn push_candidate(candidates: &mut Vec<FileCandidate>, path: &Path, size_bytes: u64) {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        client_warn!("skipping non-unicode path {}", path.display());
        return;
    };
    candidates.push(FileCandidate {
        path: path.to_string_lossy().into_owned(),
        name: name.to_string(),
        size_bytes,
    });
}

#[cfg(test)]
mod tests {
    use super::gather_candidates;
    use std::fs;

    #[test]
    fn files_and_directory_children_are_gathered() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("batch");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.docx"), b"aaaa").unwrap();
        fs::write(dir.join("notes.txt"), b"bb").unwrap();
        let single = temp.path().join("single.docx");
        fs::write(&single, b"cccccc").unwrap();

        let candidates = gather_candidates(&[dir, single]).unwrap();
        let mut names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();

        // Everything is offered; the policy filters later.
        assert_eq!(names, vec!["a.docx", "notes.txt", "single.docx"]);
        let single = candidates.iter().find(|c| c.name == "single.docx").unwrap();
        assert_eq!(single.size_bytes, 6);
    }

    #[test]
    fn missing_input_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope.docx");
        assert!(gather_candidates(&[missing]).is_err());
    }

    #[test]
    fn nested_directories_are_not_descended() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("batch");
        fs::create_dir(&dir).unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("deep.docx"), b"x").unwrap();
        fs::write(dir.join("top.docx"), b"x").unwrap();

        let candidates = gather_candidates(std::slice::from_ref(&dir)).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "top.docx");
    }
}
