//! Persistence for annotated documents - JSONL save/load.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::data::AnnotatedDocument;
use crate::error::{QuarryError, Result};

/// Save annotated documents as JSONL, one document per line.
pub fn save_annotated_documents(
    path: impl AsRef<Path>,
    documents: &[AnnotatedDocument],
) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                QuarryError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(|e| QuarryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut writer = BufWriter::new(file);
    for document in documents {
        let line = serde_json::to_string(document)?;
        writeln!(writer, "{}", line).map_err(|e| QuarryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    writer.flush().map_err(|e| QuarryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Load annotated documents from a JSONL file.
///
/// Blank lines are skipped; a malformed line is an error naming its
/// (1-based) line number.
pub fn load_annotated_documents(path: impl AsRef<Path>) -> Result<Vec<AnnotatedDocument>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| QuarryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let reader = BufReader::new(file);
    let mut documents = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| QuarryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let document: AnnotatedDocument = serde_json::from_str(&line).map_err(|e| {
            QuarryError::Persistence(format!(
                "Malformed document at {}:{}: {}",
                path.display(),
                line_number + 1,
                e
            ))
        })?;
        documents.push(document);
    }

    Ok(documents)
}

/// Generate an output path for an input file.
///
/// # Example
///
/// ```
/// use quarry::io::annotated_path;
///
/// let path = annotated_path("notes/pt_notes.txt");
/// assert_eq!(path.to_string_lossy(), "notes/pt_notes.extractions.jsonl");
/// ```
pub fn annotated_path(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));

    parent.join(format!("{}.extractions.jsonl", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AlignmentStatus, CharInterval, Extraction};

    fn sample_document() -> AnnotatedDocument {
        AnnotatedDocument::new(
            "doc_test",
            "Patient underwent ORIF of the right hip.",
            vec![
                Extraction::new("surgery", "ORIF")
                    .with_attribute("body_part", "right hip")
                    .with_interval(CharInterval::new(18, 22), AlignmentStatus::MatchExact),
            ],
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");

        save_annotated_documents(&path, &[sample_document(), sample_document()]).unwrap();
        let loaded = load_annotated_documents(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].document_id, "doc_test");
        assert_eq!(loaded[0].extractions[0].extraction_class, "surgery");
        assert_eq!(
            loaded[0].extractions[0].char_interval,
            Some(CharInterval::new(18, 22))
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/results.jsonl");

        save_annotated_documents(&path, &[sample_document()]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");

        let line = serde_json::to_string(&sample_document()).unwrap();
        fs::write(&path, format!("{}\n\n{}\n", line, line)).unwrap();

        let loaded = load_annotated_documents(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_load_reports_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");

        let line = serde_json::to_string(&sample_document()).unwrap();
        fs::write(&path, format!("{}\nnot json\n", line)).unwrap();

        let err = load_annotated_documents(&path).unwrap_err();
        assert!(err.to_string().contains(":2"));
    }

    #[test]
    fn test_annotated_path() {
        assert_eq!(
            annotated_path("data/notes.txt").to_string_lossy(),
            "data/notes.extractions.jsonl"
        );
        assert_eq!(
            annotated_path("notes.txt").to_string_lossy(),
            "notes.extractions.jsonl"
        );
    }
}
