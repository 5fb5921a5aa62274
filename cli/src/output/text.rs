//! Plain-text rendering of listings and batch reports

use review_engine::{BatchReport, CommentRequest, DocumentListing, RunInfo};
use std::io::{Result, Write};

const RULE_WIDTH: usize = 80;

/// The numbered run listing a reviewer reads before writing requests
pub fn write_listing<W: Write>(w: &mut W, source: &str, listing: &DocumentListing) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(w, "{}", rule)?;
    writeln!(w, "READING: {}", source)?;
    writeln!(w, "{}", rule)?;

    writeln!(w, "\nDOCUMENT STATISTICS:")?;
    writeln!(w, "   Total runs: {}", listing.total_runs)?;
    writeln!(w, "   Total characters: {}", listing.total_chars)?;
    writeln!(w, "   Existing comments: {}", listing.comments.len())?;

    if !listing.comments.is_empty() {
        writeln!(w, "\nEXISTING COMMENTS:")?;
        for comment in &listing.comments {
            let paragraph = comment
                .paragraph
                .map(|p| format!(" (Paragraph {})", p))
                .unwrap_or_default();
            writeln!(w, "   [{}]{} {}", comment.author, paragraph, comment.text)?;
        }
    }

    if !listing.images.is_empty() {
        writeln!(w, "\nIMAGES:")?;
        for image in &listing.images {
            writeln!(
                w,
                "   {} (Paragraph {}, Run {})",
                image.filename, image.paragraph, image.run
            )?;
        }
    }

    for (title, notes) in [("FOOTNOTES", &listing.footnotes), ("ENDNOTES", &listing.endnotes)] {
        if !notes.is_empty() {
            writeln!(w, "\n{}:", title)?;
            for note in notes {
                writeln!(w, "   [{}] {}", note.id, note.content)?;
            }
        }
    }

    if !listing.equations.is_empty() {
        writeln!(w, "\nEQUATIONS:")?;
        for equation in &listing.equations {
            writeln!(w, "   (Paragraph {}) {}", equation.paragraph, equation.text)?;
        }
    }

    writeln!(w, "\nALL RUNS (numbered for reference):")?;
    writeln!(w, "{}", rule)?;

    let mut current = None;
    for run in &listing.runs {
        if current != Some(run.paragraph) {
            current = Some(run.paragraph);
            writeln!(w, "\n--- Paragraph {} ---", run.paragraph)?;
        }
        writeln!(w, "{}", run_line(run))?;
    }

    writeln!(w, "{}", rule)?;
    writeln!(w, "\nDocument read complete. Total runs: {}", listing.total_runs)?;
    if listing.total_runs > 0 {
        writeln!(
            w,
            "   (Runs are numbered from [Run 0] to [Run {}])",
            listing.total_runs - 1
        )?;
    }
    Ok(())
}

/// `[Run N] text [TAGS]` plus any cell, image and note annotations
fn run_line(run: &RunInfo) -> String {
    let mut tags = Vec::new();
    if run.is_hyperlink {
        tags.push("LINK");
    }
    if run.bold {
        tags.push("BOLD");
    }
    if run.italic {
        tags.push("ITALIC");
    }
    if run.inserted {
        tags.push("INSERTED");
    }

    let mut line = if run.text.is_empty() {
        format!("[Run {}] [EMPTY]", run.id)
    } else {
        format!("[Run {}] {}", run.id, run.text)
    };
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    if let Some(url) = &run.hyperlink_url {
        line.push_str(&format!(" <{}>", url));
    }
    if let Some(table) = &run.table {
        line.push_str(&format!(
            " (cell {},{} of {}x{})",
            table.row, table.col, table.num_rows, table.num_cols
        ));
    }
    if let Some(image) = &run.image {
        line.push_str(&format!(" {{image: {}}}", image));
    }
    if let Some(id) = &run.footnote_ref {
        line.push_str(&format!(" {{footnote {}}}", id));
    }
    if let Some(id) = &run.endnote_ref {
        line.push_str(&format!(" {{endnote {}}}", id));
    }
    line
}

/// Per-request results in application order followed by the totals
pub fn write_report<W: Write>(w: &mut W, requests: &[CommentRequest], report: &BatchReport) -> Result<()> {
    for outcome in &report.outcomes {
        let target = requests
            .get(outcome.index)
            .map(CommentRequest::describe)
            .unwrap_or_default();
        match &outcome.result {
            Ok(id) => writeln!(w, "OK    #{} {} -> comment {}", outcome.index, target, id)?,
            Err(e) => writeln!(w, "FAIL  #{} {}: {}", outcome.index, target, e)?,
        }
    }
    writeln!(
        w,
        "\nBatch result: {} succeeded, {} failed (out of {})",
        report.successes(),
        report.failures(),
        report.outcomes.len()
    )
}
