//! Conversion options, optionally read from a YAML file.
//!
//! ```yaml
//! mode: five        # or seven (default)
//! long-notes: true
//! wav-dir: ../ogg
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConvertError;
use crate::layout::KeyMode;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct ConvertOptions {
    pub mode: KeyMode,
    /// Write sustained notes to long-note channels and declare `#LNTYPE 1`.
    pub long_notes: bool,
    /// Directory prefix for `#WAV` declarations.
    pub wav_dir: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: KeyMode::default(),
            long_notes: true,
            wav_dir: None,
        }
    }
}

impl ConvertOptions {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConvertError> {
        serde_yaml::from_str(content).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    /// Path written after `#WAVxx` for a clip file.
    pub fn wav_path(&self, filename: &str) -> String {
        match self.wav_dir.as_deref() {
            Some(dir) if !dir.is_empty() => format!("{}/{}", dir.trim_end_matches(['/', '\\']), filename),
            _ => filename.to_string(),
        }
    }
}
