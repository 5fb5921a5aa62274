//! Package output: entries go into a fresh ZIP archive in the order given

use crate::docx::document::{PackageEntry, WordDocument};
use crate::docx::error::DocxResult;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub struct DocxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> DocxWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
        }
    }

    /// Write every entry of `document` and finish the archive
    pub fn write(mut self, document: &WordDocument) -> DocxResult<W> {
        for entry in document.output_entries()? {
            self.write_entry(&entry)?;
        }
        Ok(self.zip.finish()?)
    }

    fn write_entry(&mut self, entry: &PackageEntry) -> DocxResult<()> {
        let options = SimpleFileOptions::default().compression_method(compression_for(&entry.name));
        self.zip.start_file(entry.name.as_str(), options)?;
        self.zip.write_all(&entry.data)?;
        Ok(())
    }
}

/// Media parts are already compressed and are stored as is
fn compression_for(name: &str) -> CompressionMethod {
    if name.split('/').any(|segment| segment == "media") {
        CompressionMethod::Stored
    } else {
        CompressionMethod::Deflated
    }
}
