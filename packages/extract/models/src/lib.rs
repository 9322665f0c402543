#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Debt record, bucket, and report types for tax-status extraction.
//!
//! Every type here is built fresh by a single extraction run and never
//! mutated afterwards. The extraction crate produces them; callers (the CLI,
//! or any display layer) only read them.

pub mod locale;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The text of one page of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number in the source document.
    pub page_number: u32,
    /// Extracted text of the page.
    pub text: String,
}

impl PageText {
    /// Creates a new page.
    #[must_use]
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// One parsed debt line item.
///
/// All fields are kept exactly as they appear in the source text. Amounts
/// use pt-BR formatting (`1.234,56`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRecord {
    /// Revenue code plus description (`0561-07 - IRRF`) or `SIMPLES NAC.`.
    pub category_label: String,
    /// Assessment period, `MM/YYYY`.
    pub period: String,
    /// Due date, `DD/MM/YYYY`.
    pub due_date: String,
    pub original_amount: String,
    pub outstanding_balance: String,
    pub fine: String,
    pub interest: String,
    /// Balance including fine and interest. This is the field that gets summed.
    pub consolidated_balance: String,
    /// Free-text status (`DEVEDOR`, `EXIGIBILIDADE SUSPENSA`, ...).
    pub status: String,
}

/// Classification bucket for a [`DebtRecord`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryBucket {
    /// Debts under the simplified small-business regime (`SIMPLES NAC.`).
    SimplifiedRegime,
    /// Social security contributions (labels containing `CP`).
    SocialSecurityContribution,
    /// Everything else.
    Other,
}

impl CategoryBucket {
    /// Returns all variants of this enum, in report order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SimplifiedRegime,
            Self::SocialSecurityContribution,
            Self::Other,
        ]
    }

    /// Human-readable (pt-BR) title used by the text report.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::SimplifiedRegime => "Simples Nacional",
            Self::SocialSecurityContribution => "Previdenciário",
            Self::Other => "Demais débitos",
        }
    }
}

/// Count and sum of one bucket's consolidated balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub count: u64,
    /// Sum of the balances.
    pub amount: Decimal,
    /// Sum as a fixed-point string with two decimals (`1300.00`).
    pub total: String,
    /// Sum in pt-BR formatting (`1.300,00`).
    pub formatted_total: String,
    /// Records whose balance failed to parse and contributed zero.
    pub unparsable: u64,
}

impl Default for AggregateTotals {
    fn default() -> Self {
        Self {
            count: 0,
            amount: Decimal::ZERO,
            total: locale::format_fixed(Decimal::ZERO),
            formatted_total: locale::format_br(Decimal::ZERO),
            unparsable: 0,
        }
    }
}

/// The records of one bucket plus their totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketReport {
    pub records: Vec<DebtRecord>,
    pub totals: AggregateTotals,
}

/// Result of running the debt pipeline over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtReport {
    pub simplified_regime: BucketReport,
    pub social_security: BucketReport,
    pub other: BucketReport,
    /// Whether both section markers were found. When `false` every bucket is
    /// empty.
    pub section_found: bool,
    /// Text fragments inside the section that did not form a record.
    pub skipped_fragments: u64,
}

impl DebtReport {
    /// Report for a document without an extractable debt section.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the report for `bucket`.
    #[must_use]
    pub const fn bucket(&self, bucket: CategoryBucket) -> &BucketReport {
        match bucket {
            CategoryBucket::SimplifiedRegime => &self.simplified_regime,
            CategoryBucket::SocialSecurityContribution => &self.social_security,
            CategoryBucket::Other => &self.other,
        }
    }

    /// Total number of records across all buckets.
    #[must_use]
    pub fn record_count(&self) -> usize {
        CategoryBucket::all()
            .iter()
            .map(|&b| self.bucket(b).records.len())
            .sum()
    }
}

/// Debtor name and tax identifier from an active-debt certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtorIdentity {
    pub name: Option<String>,
    /// CPF or CNPJ, as printed.
    pub tax_id: Option<String>,
}

/// Payment-capacity (CAPAG) figures, as printed in pt-BR formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCapacity {
    /// Payment capacity over 60 months.
    pub capacity: Option<String>,
    /// Total debt across PGFN and RFB.
    pub total_debt: Option<String>,
}

impl PaymentCapacity {
    #[must_use]
    pub fn capacity_amount(&self) -> Option<Decimal> {
        self.capacity.as_deref().and_then(locale::parse_br)
    }

    #[must_use]
    pub fn total_debt_amount(&self) -> Option<Decimal> {
        self.total_debt.as_deref().and_then(locale::parse_br)
    }
}

/// Page texts of the documents supplied for one debtor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocuments {
    /// Tax-status report ("Relatório de Situação Fiscal").
    pub status: Option<Vec<PageText>>,
    /// Active-debt certificate naming the debtor.
    pub certificate: Option<Vec<PageText>>,
    /// Payment-capacity (CAPAG) report.
    pub capag: Option<Vec<PageText>>,
}

/// Results of every extraction run for one debtor.
///
/// Each field is filled only by its own extraction. A field is `None` when
/// the corresponding document was not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedReport {
    pub identity: Option<DebtorIdentity>,
    pub capacity: Option<PaymentCapacity>,
    pub debts: Option<DebtReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_names_round_trip_through_strum() {
        for &bucket in CategoryBucket::all() {
            let parsed: CategoryBucket = bucket.as_ref().parse().unwrap();
            assert_eq!(parsed, bucket);
        }
        assert_eq!(
            CategoryBucket::SocialSecurityContribution.to_string(),
            "SOCIAL_SECURITY_CONTRIBUTION"
        );
    }

    #[test]
    fn empty_report_has_zero_totals() {
        let report = DebtReport::empty();
        assert!(!report.section_found);
        assert_eq!(report.record_count(), 0);
        for &bucket in CategoryBucket::all() {
            let totals = &report.bucket(bucket).totals;
            assert_eq!(totals.count, 0);
            assert_eq!(totals.total, "0.00");
            assert_eq!(totals.formatted_total, "0,00");
        }
    }

    #[test]
    fn capacity_amounts_parse_locale_strings() {
        let capacity = PaymentCapacity {
            capacity: Some("12.345,67".to_string()),
            total_debt: Some("bogus".to_string()),
        };
        assert_eq!(
            capacity.capacity_amount(),
            Some(Decimal::new(1_234_567, 2))
        );
        assert!(capacity.total_debt_amount().is_none());
    }
}
