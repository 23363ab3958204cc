//! Run configuration.
//!
//! Every option has a default, so a JSON config file only needs to list the
//! fields it changes. The CLI layers its flags on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::TextColor;
use crate::error::{CertError, Result};
use crate::fonts::{FaceOptions, Hinting, BASE_DPI};
use crate::records::RecordOptions;

/// Everything one certificate run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Background image every certificate starts from.
    pub template_path: PathBuf,
    /// Delimited file whose first column holds the names.
    pub records_path: PathBuf,
    /// Directory receiving `<name>_certificate.png` files. Created if missing.
    pub output_dir: PathBuf,
    pub font_path: PathBuf,
    /// Font size in points.
    pub font_size: f32,
    pub dpi: f32,
    pub hinting: Hinting,
    pub text_color: TextColor,
    /// Y coordinate of the text baseline, in template pixels.
    pub baseline_y: f32,
    pub has_headers: bool,
    pub delimiter: char,
    /// Replace path separators and reserved characters in output file names.
    pub sanitize_names: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("certificate_template.png"),
            records_path: PathBuf::from("names.csv"),
            output_dir: PathBuf::from("output_certificates"),
            font_path: PathBuf::from("Augillion.otf"),
            font_size: 100.0,
            dpi: BASE_DPI,
            hinting: Hinting::Full,
            text_color: TextColor::BLACK,
            baseline_y: 800.0,
            has_headers: true,
            delimiter: ',',
            sanitize_names: false,
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CertError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| CertError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject option values no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(CertError::Config(format!(
                "font_size must be a positive number, got {}",
                self.font_size
            )));
        }
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(CertError::Config(format!(
                "dpi must be a positive number, got {}",
                self.dpi
            )));
        }
        if !self.baseline_y.is_finite() {
            return Err(CertError::Config(format!(
                "baseline_y must be finite, got {}",
                self.baseline_y
            )));
        }
        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            return Err(CertError::Config(format!(
                "delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }

    pub fn face_options(&self) -> FaceOptions {
        FaceOptions {
            size: self.font_size,
            dpi: self.dpi,
            hinting: self.hinting,
        }
    }

    pub fn record_options(&self) -> RecordOptions {
        RecordOptions {
            has_headers: self.has_headers,
            delimiter: self.delimiter as u8,
        }
    }
}
