//! Single-value summary fields from the companion documents.
//!
//! The active-debt certificate names the debtor and their CPF/CNPJ; the
//! CAPAG report states the payment capacity and the total debt. Each value
//! is the first capture group of a configured pattern, run against the
//! assembled (not normalized) document text.

use regex::Regex;
use sitfis_extract_models::{DebtorIdentity, PaymentCapacity};

use crate::ConfigError;
use crate::config::FieldPatterns;

/// Compiled summary-field patterns.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    debtor_name: Regex,
    tax_id: Regex,
    capacity: Regex,
    total_debt: Regex,
}

impl FieldExtractor {
    /// Compiles the configured patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a pattern fails to compile, or
    /// [`ConfigError::MissingCaptureGroup`] if it has no capture group.
    pub fn new(patterns: &FieldPatterns) -> Result<Self, ConfigError> {
        Ok(Self {
            debtor_name: compile("fields.debtor_name", &patterns.debtor_name)?,
            tax_id: compile("fields.tax_id", &patterns.tax_id)?,
            capacity: compile("fields.capacity", &patterns.capacity)?,
            total_debt: compile("fields.total_debt", &patterns.total_debt)?,
        })
    }

    /// Reads the debtor name and tax id.
    #[must_use]
    pub fn identity(&self, text: &str) -> DebtorIdentity {
        DebtorIdentity {
            name: first_capture(&self.debtor_name, text),
            tax_id: first_capture(&self.tax_id, text),
        }
    }

    /// Reads the payment capacity and total debt. Trailing punctuation from
    /// the surrounding sentence is dropped.
    #[must_use]
    pub fn capacity(&self, text: &str) -> PaymentCapacity {
        PaymentCapacity {
            capacity: first_capture(&self.capacity, text).map(strip_trailing_punctuation),
            total_debt: first_capture(&self.total_debt, text).map(strip_trailing_punctuation),
        }
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex, ConfigError> {
    let re = Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        name: name.to_string(),
        source,
    })?;
    if re.captures_len() < 2 {
        return Err(ConfigError::MissingCaptureGroup {
            name: name.to_string(),
        });
    }
    Ok(re)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn strip_trailing_punctuation(value: String) -> String {
    let trimmed = value.trim_end_matches(['.', ',']);
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}
