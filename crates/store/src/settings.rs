//! Who signs new comments and how the commented copy is named

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_AUTHOR: &str = "Claude";
pub const DEFAULT_INITIALS: &str = "CS";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "claude commented";

/// Applied to every comment of a batch. Missing JSON fields take defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewSettings {
    pub author: String,
    pub initials: String,
    /// Appended to the input's stem to name the output file
    pub output_suffix: String,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            initials: DEFAULT_INITIALS.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl ReviewSettings {
    /// Values given on the command line win over the file
    pub fn with_overrides(
        mut self,
        author: Option<String>,
        initials: Option<String>,
        output_suffix: Option<String>,
    ) -> Self {
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(initials) = initials {
            self.initials = initials;
        }
        if let Some(output_suffix) = output_suffix {
            self.output_suffix = output_suffix;
        }
        self
    }
}

/// Reviewer settings backed by a JSON file
pub struct SettingsManager {
    path: PathBuf,
    current: ReviewSettings,
}

impl SettingsManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: ReviewSettings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file into the cached settings.
    ///
    /// Absent or unparsable files yield defaults. Other read failures are errors.
    pub fn load_sync(&mut self) -> Result<&ReviewSettings> {
        self.current = match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed settings");
                ReviewSettings::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ReviewSettings::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(&self.current)
    }

    pub fn save_sync(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.current)?)?;
        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    pub fn get(&self) -> &ReviewSettings {
        &self.current
    }

    /// Replace the cached settings without touching the file
    pub fn update(&mut self, settings: ReviewSettings) {
        self.current = settings;
    }
}
