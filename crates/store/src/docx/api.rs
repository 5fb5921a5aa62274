//! Public API for opening and saving Word packages

use crate::docx::document::WordDocument;
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::parser::DocxParser;
use crate::docx::writer::DocxWriter;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::{Path, PathBuf};

/// Open a DOCX file from disk.
///
/// The file is read completely and closed before this returns.
///
/// # Example
///
/// ```ignore
/// use store::docx::open_docx;
/// use std::path::Path;
///
/// let doc = open_docx(Path::new("document.docx"))?;
/// ```
pub fn open_docx(path: &Path) -> DocxResult<WordDocument> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocxError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ))
        } else {
            DocxError::Io(e)
        }
    })?;

    DocxParser::parse(BufReader::new(file))
}

/// Open a DOCX from an in-memory byte slice
pub fn open_docx_bytes(bytes: &[u8]) -> DocxResult<WordDocument> {
    DocxParser::parse(Cursor::new(bytes))
}

/// Save a document to disk, creating parent directories as needed
pub fn save_docx(document: &WordDocument, path: &Path) -> DocxResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let writer = DocxWriter::new(BufWriter::new(file));
    let mut buffered = writer.write(document)?;
    std::io::Write::flush(&mut buffered)?;
    tracing::info!(path = %path.display(), "Saved document");
    Ok(())
}

/// Serialize a document to bytes
pub fn save_docx_bytes(document: &WordDocument) -> DocxResult<Vec<u8>> {
    let cursor = DocxWriter::new(Cursor::new(Vec::new())).write(document)?;
    Ok(cursor.into_inner())
}

/// Path of the commented copy: `<dir>/<stem> - <suffix>.<ext>`.
///
/// The extension defaults to `docx` when the input has none.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "docx".to_string());
    let file_name = format!("{} - {}.{}", stem, suffix, extension);
    match input.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
