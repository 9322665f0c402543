//! End-to-end extraction for one document, and the combined report.

use sitfis_extract_models::{
    BucketReport, CategoryBucket, CombinedReport, DebtRecord, DebtReport, DebtorIdentity, PageText,
    PaymentCapacity, SourceDocuments,
};

use crate::config::ExtractionConfig;
use crate::fields::FieldExtractor;
use crate::normalize::Normalizer;
use crate::section::{self, SectionError};
use crate::tokenizer::{self, RawRecord};
use crate::{ConfigError, aggregate, classify, document};

/// A compiled extraction configuration.
///
/// Holds no per-document state; one instance can process any number of
/// documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    normalizer: Normalizer,
    start_markers: Vec<String>,
    end_marker: String,
    fields: FieldExtractor,
}

impl Extractor {
    /// Compiles `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any configured pattern fails to compile.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        // Markers are matched against normalized text, so normalize them too.
        let start_markers: Vec<String> = config
            .section
            .start_markers
            .iter()
            .map(|m| collapse_whitespace(m))
            .filter(|m| !m.is_empty())
            .collect();

        Ok(Self {
            normalizer: Normalizer::new(&config.noise.header_phrases, &start_markers)?,
            end_marker: collapse_whitespace(&config.section.end_marker),
            start_markers,
            fields: FieldExtractor::new(&config.fields)?,
        })
    }

    /// Runs the debt pipeline over the pages of a tax-status report.
    #[must_use]
    pub fn debts(&self, pages: &[PageText]) -> DebtReport {
        self.debts_from_text(&document::assemble(pages))
    }

    /// Runs the debt pipeline over already-assembled document text.
    ///
    /// A document without the section markers yields
    /// [`DebtReport::empty`].
    #[must_use]
    pub fn debts_from_text(&self, text: &str) -> DebtReport {
        let normalized = self.normalizer.normalize(text);

        let section = match section::isolate(&normalized, &self.start_markers, &self.end_marker) {
            Ok(section) => section,
            Err(SectionError::MarkerNotFound { role }) => {
                log::info!("No debt section found ({role} marker missing)");
                return DebtReport::empty();
            }
        };

        let tokenized = tokenizer::tokenize(section);

        let mut simplified_regime = Vec::new();
        let mut social_security = Vec::new();
        let mut other = Vec::new();

        for raw in &tokenized.records {
            let record = to_record(raw);
            match classify::classify(&record.category_label) {
                CategoryBucket::SimplifiedRegime => simplified_regime.push(record),
                CategoryBucket::SocialSecurityContribution => social_security.push(record),
                CategoryBucket::Other => other.push(record),
            }
        }

        let report = DebtReport {
            simplified_regime: bucket_report(simplified_regime),
            social_security: bucket_report(social_security),
            other: bucket_report(other),
            section_found: true,
            skipped_fragments: tokenized.skipped_fragments,
        };

        for &bucket in CategoryBucket::all() {
            let totals = &report.bucket(bucket).totals;
            log::info!(
                "{bucket}: {} record(s), total {}",
                totals.count,
                totals.formatted_total
            );
        }

        report
    }

    /// Reads the debtor identity from an active-debt certificate.
    #[must_use]
    pub fn identity(&self, pages: &[PageText]) -> DebtorIdentity {
        self.fields.identity(&document::assemble(pages))
    }

    /// Reads the payment-capacity figures from a CAPAG report.
    #[must_use]
    pub fn capacity(&self, pages: &[PageText]) -> PaymentCapacity {
        self.fields.capacity(&document::assemble(pages))
    }

    /// Runs each extraction on its own document and composes the results.
    ///
    /// Each report field is filled only from its own document and stays
    /// `None` when that document was not supplied.
    #[must_use]
    pub fn combined(&self, documents: &SourceDocuments) -> CombinedReport {
        CombinedReport {
            identity: documents
                .certificate
                .as_deref()
                .map(|pages| self.identity(pages)),
            capacity: documents.capag.as_deref().map(|pages| self.capacity(pages)),
            debts: documents.status.as_deref().map(|pages| self.debts(pages)),
        }
    }
}

fn to_record(raw: &RawRecord<'_>) -> DebtRecord {
    let [original_amount, outstanding_balance, fine, interest, consolidated_balance] = raw.amounts;
    DebtRecord {
        category_label: raw.category_label.to_string(),
        period: raw.period.to_string(),
        due_date: raw.due_date.to_string(),
        original_amount: original_amount.to_string(),
        outstanding_balance: outstanding_balance.to_string(),
        fine: fine.to_string(),
        interest: interest.to_string(),
        consolidated_balance: consolidated_balance.to_string(),
        status: raw.status.to_string(),
    }
}

fn bucket_report(records: Vec<DebtRecord>) -> BucketReport {
    let totals = aggregate::aggregate(&records);
    BucketReport { records, totals }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
