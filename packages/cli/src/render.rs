//! Plain-text rendering of extraction reports.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use sitfis_extract_models::{CategoryBucket, CombinedReport, DebtReport, locale};

/// Renders one bucket section per category, each followed by its records.
pub fn debt_report(report: &DebtReport) -> String {
    let mut out = String::new();

    if !report.section_found {
        out.push_str("No debt section found.\n");
        return out;
    }

    for &bucket in CategoryBucket::all() {
        let section = report.bucket(bucket);
        let totals = &section.totals;
        writeln!(
            out,
            "{}: {} record(s), total R$ {}",
            bucket.title(),
            totals.count,
            totals.formatted_total
        )
        .unwrap();

        for record in &section.records {
            writeln!(
                out,
                "  {:<40} {:>7} {:>10} {:>16} {}",
                record.category_label,
                record.period,
                record.due_date,
                record.consolidated_balance,
                record.status
            )
            .unwrap();
        }

        if totals.unparsable > 0 {
            writeln!(
                out,
                "  ({} balance(s) could not be read and count as zero)",
                totals.unparsable
            )
            .unwrap();
        }
    }

    if report.skipped_fragments > 0 {
        writeln!(
            out,
            "{} unrecognized fragment(s) skipped",
            report.skipped_fragments
        )
        .unwrap();
    }

    out
}

/// Renders whichever parts of the combined report are present.
pub fn combined_report(report: &CombinedReport) -> String {
    let mut out = String::new();

    if let Some(identity) = &report.identity {
        writeln!(
            out,
            "Debtor: {}",
            identity.name.as_deref().unwrap_or("(not found)")
        )
        .unwrap();
        writeln!(
            out,
            "CPF/CNPJ: {}",
            identity.tax_id.as_deref().unwrap_or("(not found)")
        )
        .unwrap();
    }

    if let Some(capacity) = &report.capacity {
        writeln!(
            out,
            "Payment capacity (60 months): {}",
            money(capacity.capacity_amount(), capacity.capacity.as_deref())
        )
        .unwrap();
        writeln!(
            out,
            "Total debt (PGFN + RFB): {}",
            money(capacity.total_debt_amount(), capacity.total_debt.as_deref())
        )
        .unwrap();
    }

    if let Some(debts) = &report.debts {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&debt_report(debts));
    }

    out
}

/// Reformats a parsed amount in pt-BR style, falling back to the text as
/// printed when it is not a number.
fn money(amount: Option<Decimal>, raw: Option<&str>) -> String {
    match (amount, raw) {
        (Some(amount), _) => format!("R$ {}", locale::format_br(amount)),
        (None, Some(raw)) => format!("R$ {raw}"),
        (None, None) => "(not found)".to_string(),
    }
}
