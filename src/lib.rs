//! # cert-forge – batch certificate generator
//!
//! Renders each name from a delimited file onto a copy of a template image
//! and writes one PNG per name. The stages are:
//!
//! 1. **Load** – decode the template ([`image_store`]) and build a font face
//!    ([`fonts`])
//! 2. **Read** – iterate name records ([`records`])
//! 3. **Compose** – copy the template and draw the centered name
//!    ([`compositor`])
//! 4. **Save** – encode each certificate as `<name>_certificate.png`
//!
//! [`pipeline`] drives the stages from a [`config::GeneratorConfig`] and
//! reports a [`pipeline::RunSummary`].

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod fonts;
pub mod image_store;
pub mod pipeline;
pub mod records;

// Re-exports for convenience
pub use color::TextColor;
pub use config::GeneratorConfig;
pub use error::CertError;
pub use pipeline::{generate_certificates, generate_certificates_with, RecordOutcome, RecordStatus, RunSummary};
