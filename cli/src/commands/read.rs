use crate::output::text::write_listing;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

pub fn run(path: &Path, json: bool) -> Result<ExitCode> {
    let listing = review_engine::read_document(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut handle, &listing)?;
        writeln!(handle)?;
    } else {
        write_listing(&mut handle, &path.display().to_string(), &listing)?;
    }
    Ok(ExitCode::SUCCESS)
}
