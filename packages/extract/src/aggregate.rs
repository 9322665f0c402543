//! Counts and sums the consolidated balances of a bucket.

use rust_decimal::Decimal;
use sitfis_extract_models::{AggregateTotals, DebtRecord, locale};

/// Aggregates `records`.
///
/// Each record's [`DebtRecord::consolidated_balance`] is parsed as a pt-BR
/// amount. A balance that does not parse adds zero to the sum but the record
/// still counts; such records are tallied in
/// [`AggregateTotals::unparsable`].
#[must_use]
pub fn aggregate(records: &[DebtRecord]) -> AggregateTotals {
    let mut amount = Decimal::ZERO;
    let mut unparsable = 0;

    for record in records {
        if let Some(value) = locale::parse_br(&record.consolidated_balance) {
            amount += value;
        } else {
            log::warn!(
                "Unparsable consolidated balance {:?} for {} ({}); counting as zero",
                record.consolidated_balance,
                record.category_label,
                record.period
            );
            unparsable += 1;
        }
    }

    AggregateTotals {
        count: records.len() as u64,
        amount,
        total: locale::format_fixed(amount),
        formatted_total: locale::format_br(amount),
        unparsable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_balance(balance: &str) -> DebtRecord {
        DebtRecord {
            category_label: "0561-07 - IRRF".to_string(),
            period: "03/2023".to_string(),
            due_date: "20/04/2023".to_string(),
            original_amount: "1,00".to_string(),
            outstanding_balance: "1,00".to_string(),
            fine: "0,00".to_string(),
            interest: "0,00".to_string(),
            consolidated_balance: balance.to_string(),
            status: "DEVEDOR".to_string(),
        }
    }

    #[test]
    fn sums_locale_formatted_balances() {
        let totals = aggregate(&[with_balance("1.234,56"), with_balance("65,44")]);
        assert_eq!(totals.count, 2);
        assert_eq!(totals.total, "1300.00");
        assert_eq!(totals.formatted_total, "1.300,00");
        assert_eq!(totals.amount, Decimal::new(130_000, 2));
        assert_eq!(totals.unparsable, 0);
    }

    #[test]
    fn unparsable_balance_counts_but_adds_zero() {
        let totals = aggregate(&[with_balance("97,00"), with_balance("1,2,3")]);
        assert_eq!(totals.count, 2);
        assert_eq!(totals.total, "97.00");
        assert_eq!(totals.unparsable, 1);
    }

    #[test]
    fn empty_bucket() {
        let totals = aggregate(&[]);
        assert_eq!(totals, AggregateTotals::default());
        assert_eq!(totals.total, "0.00");
    }

    #[test]
    fn large_sums_keep_grouping() {
        let totals = aggregate(&[with_balance("1.000.000,01"), with_balance("2.345.678,99")]);
        assert_eq!(totals.total, "3345679.00");
        assert_eq!(totals.formatted_total, "3.345.679,00");
    }
}
