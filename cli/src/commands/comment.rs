use crate::commands::EXIT_PARTIAL;
use crate::output::text::write_report;
use anyhow::{Context, Result};
use review_engine::{comment_document, parse_batch, CommentOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use store::{output_path_for, ReviewSettings, SettingsManager};

pub struct CommentArgs {
    pub path: PathBuf,
    pub batch: PathBuf,
    pub author: Option<String>,
    pub initials: Option<String>,
    pub suffix: Option<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub json: bool,
}

pub fn run(args: CommentArgs) -> Result<ExitCode> {
    let settings = load_settings(args.config)?.with_overrides(args.author, args.initials, args.suffix);

    let batch = std::fs::read_to_string(&args.batch)
        .with_context(|| format!("Failed to read batch file: {}", args.batch.display()))?;
    let requests = parse_batch(&batch)
        .with_context(|| format!("Invalid batch file: {}", args.batch.display()))?;
    if requests.is_empty() {
        anyhow::bail!("No comments provided in {}", args.batch.display());
    }

    let output = args
        .output
        .unwrap_or_else(|| output_path_for(&args.path, &settings.output_suffix));
    if is_same_file(&args.path, &output) {
        anyhow::bail!(
            "Output {} would overwrite the input document",
            output.display()
        );
    }
    let options = CommentOptions::new(settings.author.as_str(), settings.initials.as_str());
    let report = comment_document(&args.path, &output, &requests, &options)
        .with_context(|| format!("Failed to comment document: {}", args.path.display()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut handle, &report.summary())?;
        writeln!(handle)?;
    } else {
        write_report(&mut handle, &requests, &report)?;
        writeln!(handle, "Saved to: {}", output.display())?;
    }

    if report.failures() > 0 {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<ReviewSettings> {
    let Some(path) = config else {
        return Ok(ReviewSettings::default());
    };
    let mut manager = SettingsManager::new(path.clone());
    let settings = manager
        .load_sync()
        .with_context(|| format!("Failed to load settings: {}", path.display()))?;
    Ok(settings.clone())
}

/// True if both paths name the same file once symlinks and `..` are resolved.
/// The output may not exist yet, so only its directory is canonicalized.
fn is_same_file(input: &Path, output: &Path) -> bool {
    let Ok(input) = input.canonicalize() else {
        return false;
    };
    let resolved = match (output.parent(), output.file_name()) {
        (Some(dir), Some(name)) => {
            let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
            dir.canonicalize().map(|dir| dir.join(name))
        }
        _ => output.canonicalize(),
    };
    resolved.map(|output| output == input).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_uses_defaults() {
        assert_eq!(load_settings(None).unwrap(), ReviewSettings::default());
    }

    #[test]
    fn test_config_file_then_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("review.json");
        std::fs::write(&path, r#"{"author": "Legal", "initials": "LG"}"#).unwrap();

        let settings = load_settings(Some(path))
            .unwrap()
            .with_overrides(None, Some("LX".to_string()), None);
        assert_eq!(settings.author, "Legal");
        assert_eq!(settings.initials, "LX");
        assert_eq!(settings.output_suffix, store::settings::DEFAULT_OUTPUT_SUFFIX);
    }

    #[test]
    fn test_output_matching_input_is_detected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("report.docx");
        std::fs::write(&input, b"stub").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        assert!(is_same_file(&input, &input));
        assert!(is_same_file(&input, &dir.path().join("sub").join("..").join("report.docx")));
        assert!(!is_same_file(&input, &dir.path().join("report - reviewed.docx")));
        assert!(!is_same_file(&dir.path().join("absent.docx"), &input));
    }

    #[test]
    fn test_directory_as_config_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load settings"));
    }
}
