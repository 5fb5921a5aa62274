use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

pub fn run(path: &Path, author: &str) -> Result<ExitCode> {
    let stats = review_engine::verify_comments(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Verification:")?;
    writeln!(handle, "   Total comments: {}", stats.total)?;
    writeln!(handle, "   From {}: {}", author, stats.from_author(author))?;
    for (name, count) in &stats.by_author {
        if name != author {
            writeln!(handle, "   From {}: {}", name, count)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
