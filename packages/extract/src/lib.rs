#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Debt extraction from tax-status report text.
//!
//! Turns the concatenated page text of a Receita Federal "Relatório de
//! Situação Fiscal" into categorized, aggregated debt records. Each stage is
//! a pure function of the previous stage's output:
//!
//! 1. [`normalize`] strips page noise and collapses whitespace
//! 2. [`section`] isolates the text between the debt section markers
//! 3. [`tokenizer`] splits the section into raw nine-field records
//! 4. [`classify`] sorts each record into a [`CategoryBucket`]
//! 5. [`aggregate`] counts and sums each bucket
//!
//! [`pipeline::Extractor`] wires the stages together and also runs the
//! simpler single-field extractions ([`fields`]) used for the debtor
//! identity and payment-capacity documents.
//!
//! [`CategoryBucket`]: sitfis_extract_models::CategoryBucket

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod document;
pub mod fields;
pub mod normalize;
pub mod pipeline;
pub mod section;
pub mod tokenizer;

pub use config::ExtractionConfig;
pub use pipeline::Extractor;

/// Errors raised while loading or compiling an [`ExtractionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be deserialized.
    #[error("Invalid extraction config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured pattern failed to compile.
    #[error("Invalid pattern for '{name}': {source}")]
    Pattern {
        /// Config key of the offending pattern.
        name: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// A field pattern has no capture group to read the value from.
    #[error("Pattern for '{name}' must contain a capture group")]
    MissingCaptureGroup {
        /// Config key of the offending pattern.
        name: String,
    },

    /// A required setting is empty.
    #[error("Missing setting: {0}")]
    Missing(&'static str),
}
