//! Pipeline – loads the template and font once, then renders and saves one
//! certificate per record.
//!
//! Failures before the record loop (config, template, font, output directory,
//! records file) abort the run. Failures inside it only affect the record
//! they belong to and are reported as [`RecordOutcome`]s.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::compositor::render;
use crate::config::GeneratorConfig;
use crate::error::{CertError, Result};
use crate::fonts::{load_font, make_face, parse_font};
use crate::image_store::{load_image, save_png};
use crate::records::open_records;

/// Suffix appended to each name to form the output file name.
pub const CERTIFICATE_SUFFIX: &str = "_certificate.png";

const RESERVED_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordStatus {
    Created { path: PathBuf },
    Malformed { reason: String },
    SaveFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// Source line of the row, when known.
    pub line: Option<u64>,
    /// Name from the row; `None` when the row could not be read.
    pub name: Option<String>,
    #[serde(flatten)]
    pub status: RecordStatus,
}

impl RecordOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self.status, RecordStatus::Created { .. })
    }
}

/// Per-record outcomes of a finished run, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub created: usize,
    pub malformed: usize,
    pub failed: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl RunSummary {
    fn push(&mut self, outcome: RecordOutcome) {
        match outcome.status {
            RecordStatus::Created { .. } => self.created += 1,
            RecordStatus::Malformed { .. } => self.malformed += 1,
            RecordStatus::SaveFailed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// `true` when every record produced a certificate.
    pub fn is_clean(&self) -> bool {
        self.malformed == 0 && self.failed == 0
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Run the whole batch and collect the outcomes.
pub fn generate_certificates(config: &GeneratorConfig) -> Result<RunSummary> {
    generate_certificates_with(config, |_| {})
}

/// Like [`generate_certificates`], handing each outcome to `on_outcome` as
/// soon as it is known.
pub fn generate_certificates_with<F>(config: &GeneratorConfig, mut on_outcome: F) -> Result<RunSummary>
where
    F: FnMut(&RecordOutcome),
{
    config.validate()?;
    log::debug!("run configuration:\n{}", config.to_json());

    let template = load_image(&config.template_path)?;
    log::info!(
        "loaded template '{}' ({}x{})",
        config.template_path.display(),
        template.width(),
        template.height()
    );

    let handle = parse_font(load_font(&config.font_path)?)?;
    let face = make_face(&handle, config.face_options())?;
    log::info!(
        "loaded font '{}' ({}, {} glyphs) at {}pt/{}dpi = {}px/em",
        config.font_path.display(),
        handle.family().unwrap_or("unnamed"),
        handle.glyph_count(),
        config.font_size,
        config.dpi,
        face.pixels_per_em()
    );

    std::fs::create_dir_all(&config.output_dir).map_err(|e| CertError::io(&config.output_dir, e))?;

    let records = open_records(&config.records_path, config.record_options())?;

    let mut summary = RunSummary::default();
    let mut seen_paths: HashSet<PathBuf> = HashSet::new();

    for row in records {
        let record = match row {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping row: {e}");
                let outcome = RecordOutcome {
                    line: e.line(),
                    name: None,
                    status: RecordStatus::Malformed {
                        reason: e.to_string(),
                    },
                };
                on_outcome(&outcome);
                summary.push(outcome);
                continue;
            }
        };

        let name = record.name();
        let path = certificate_path(&config.output_dir, name, config.sanitize_names);
        check_name(name, &path, record.line, &mut seen_paths, config.sanitize_names);
        let missing = face.missing_glyphs(name);
        if !missing.is_empty() {
            log::warn!(
                "line {}: font has no glyphs for {:?} in '{name}'",
                record.line,
                missing
            );
        }

        let certificate = render(&template, &face, config.text_color, name, config.baseline_y);

        let status = match save_png(&path, &certificate) {
            Ok(()) => {
                log::debug!("line {}: wrote '{}'", record.line, path.display());
                RecordStatus::Created { path }
            }
            Err(e) => {
                log::warn!("line {}: cannot save certificate for '{name}': {e}", record.line);
                RecordStatus::SaveFailed {
                    reason: e.to_string(),
                }
            }
        };

        let outcome = RecordOutcome {
            line: Some(record.line),
            name: Some(name.to_string()),
            status,
        };
        on_outcome(&outcome);
        summary.push(outcome);
    }

    log::info!(
        "finished: {} created, {} malformed, {} failed",
        summary.created,
        summary.malformed,
        summary.failed
    );
    Ok(summary)
}

/// Output path for `name` inside `output_dir`.
///
/// Without `sanitize` the name is used verbatim, so separators in it reach
/// the filesystem as-is.
pub fn certificate_path(output_dir: &Path, name: &str, sanitize: bool) -> PathBuf {
    let stem = if sanitize {
        sanitize_file_stem(name)
    } else {
        name.to_string()
    };
    output_dir.join(format!("{stem}{CERTIFICATE_SUFFIX}"))
}

/// Replace characters that are unsafe in a file name with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

fn is_unsafe_stem(name: &str) -> bool {
    name.is_empty()
        || name == "."
        || name == ".."
        || name
            .chars()
            .any(|c| c.is_control() || RESERVED_FILENAME_CHARS.contains(&c))
}

/// Warn about unsafe names and about output paths an earlier row already
/// wrote. Returns `true` when `path` is a repeat.
fn check_name(
    name: &str,
    path: &Path,
    line: u64,
    seen: &mut HashSet<PathBuf>,
    sanitize: bool,
) -> bool {
    if !sanitize && is_unsafe_stem(name) {
        log::warn!("line {line}: name '{name}' is used verbatim as a file name and may escape the output directory or be rejected");
    }
    let repeat = !seen.insert(path.to_path_buf());
    if repeat {
        log::warn!(
            "line {line}: '{name}' overwrites an earlier certificate at '{}'",
            path.display()
        );
    }
    repeat
}
