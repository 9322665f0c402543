//! Splits an isolated debt section into raw records.
//!
//! A record looks like
//!
//! ```text
//! <label> <MM/YYYY> <DD/MM/YYYY> <amount> <amount> <amount> <amount> <amount> <status>
//! ```
//!
//! where the label is either a revenue code with description
//! (`0561-07 - IRRF`) or the literal `SIMPLES NAC.` and the status is a run
//! of uppercase words. Every field except the status has a fixed shape and is
//! read by a small `Cursor` method. The status has no terminator of its
//! own: it is extended one character at a time and stops at the first point
//! where [`is_record_start`] sees the next record (or the section ends).
//!
//! Text that does not form a complete record is skipped. Nothing partial is
//! ever returned.

/// A record as it appears in the section text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub category_label: &'a str,
    pub period: &'a str,
    pub due_date: &'a str,
    /// Original amount, outstanding balance, fine, interest, consolidated
    /// balance.
    pub amounts: [&'a str; 5],
    pub status: &'a str,
}

/// Output of [`tokenize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized<'a> {
    /// Records in document order.
    pub records: Vec<RawRecord<'a>>,
    /// Non-blank stretches of text between records that were discarded.
    pub skipped_fragments: u64,
}

const SIMPLES_LABEL: &str = "SIMPLES NAC";

/// Returns `true` if `rest` begins with a record label: a `DDDD-DD`
/// revenue code or `SIMPLES NAC`.
#[must_use]
pub fn is_record_start(rest: &str) -> bool {
    rest.starts_with(SIMPLES_LABEL) || starts_with_revenue_code(rest)
}

fn starts_with_revenue_code(rest: &str) -> bool {
    let b = rest.as_bytes();
    b.len() >= 7
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b.get(7).is_none_or(|c| !c.is_ascii_digit())
}

/// Scans `section` left to right and returns every complete record.
#[must_use]
pub fn tokenize(section: &str) -> Tokenized<'_> {
    let mut out = Tokenized::default();
    let mut pos = 0;
    let mut gap_start = 0;

    while pos < section.len() {
        let boundary = pos == gap_start
            || section[..pos]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric());

        if boundary
            && is_record_start(&section[pos..])
            && let Some((record, end)) = parse_record(section, pos)
        {
            if !section[gap_start..pos].trim().is_empty() {
                log::debug!(
                    "Skipping unmatched fragment: {:?}",
                    section[gap_start..pos].trim()
                );
                out.skipped_fragments += 1;
            }
            out.records.push(record);
            pos = end;
            gap_start = end;
            continue;
        }

        pos += section[pos..].chars().next().map_or(1, char::len_utf8);
    }

    if !section[gap_start..].trim().is_empty() {
        log::debug!(
            "Skipping trailing fragment: {:?}",
            section[gap_start..].trim()
        );
        out.skipped_fragments += 1;
    }

    log::debug!(
        "Tokenized {} record(s), skipped {} fragment(s)",
        out.records.len(),
        out.skipped_fragments
    );

    out
}

/// Parses one record starting at `start`, returning it and the byte offset
/// just past its status.
fn parse_record(section: &str, start: usize) -> Option<(RawRecord<'_>, usize)> {
    let mut cursor = Cursor::new(section, start);

    let category_label = cursor.label()?;
    cursor.separator()?;
    let period = cursor.period()?;
    cursor.separator()?;
    let due_date = cursor.date()?;

    let mut amounts = [""; 5];
    for amount in &mut amounts {
        cursor.separator()?;
        *amount = cursor.amount()?;
    }

    cursor.separator()?;
    let status = cursor.status()?;

    Some((
        RawRecord {
            category_label,
            period,
            due_date,
            amounts,
            status,
        },
        cursor.pos,
    ))
}

/// Byte cursor over the section text. Each reader either consumes exactly
/// one field and returns it, or returns `None`; a failed read leaves the
/// cursor in an unspecified position and the record is abandoned.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn eat_char(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.bump(ch);
            true
        } else {
            false
        }
    }

    /// Consumes `n` ASCII digits.
    fn digits(&mut self, n: usize) -> Option<()> {
        let rest = self.rest().as_bytes();
        if rest.len() >= n && rest[..n].iter().all(u8::is_ascii_digit) {
            self.pos += n;
            Some(())
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) -> usize {
        let before = self.pos;
        while let Some(ch) = self.peek().filter(|c| c.is_whitespace()) {
            self.bump(ch);
        }
        self.pos - before
    }

    /// One or more whitespace characters.
    fn separator(&mut self) -> Option<()> {
        (self.skip_whitespace() > 0).then_some(())
    }

    /// `DDDD-DD - description` (description runs up to the next digit) or
    /// `SIMPLES NAC` with an optional trailing period. Trailing whitespace
    /// is left unconsumed.
    fn label(&mut self) -> Option<&'a str> {
        let start = self.pos;

        if self.eat_str(SIMPLES_LABEL) {
            self.eat_char('.');
            return Some(&self.text[start..self.pos]);
        }

        self.digits(4)?;
        if !self.eat_char('-') {
            return None;
        }
        self.digits(2)?;
        self.skip_whitespace();
        if !self.eat_char('-') {
            return None;
        }
        while let Some(ch) = self.peek().filter(|c| !c.is_ascii_digit()) {
            self.bump(ch);
        }

        let label = self.text[start..self.pos].trim_end();
        self.pos = start + label.len();
        Some(label)
    }

    /// `MM/YYYY`.
    fn period(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.digits(2)?;
        self.eat_char('/').then_some(())?;
        self.digits(4)?;
        Some(&self.text[start..self.pos])
    }

    /// `DD/MM/YYYY`.
    fn date(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.digits(2)?;
        self.eat_char('/').then_some(())?;
        self.digits(2)?;
        self.eat_char('/').then_some(())?;
        self.digits(4)?;
        Some(&self.text[start..self.pos])
    }

    /// Digits with optional `.` grouping and an optional `,` followed by one
    /// or two digits.
    fn amount(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }
        while let Some(ch) = self.peek().filter(|&c| c.is_ascii_digit() || c == '.') {
            self.bump(ch);
        }
        if self.eat_char(',') {
            let mut fraction = 0;
            while fraction < 2
                && let Some(ch) = self.peek().filter(char::is_ascii_digit)
            {
                self.bump(ch);
                fraction += 1;
            }
            if fraction == 0 {
                return None;
            }
        }
        Some(&self.text[start..self.pos])
    }

    /// Uppercase words, spaces and hyphens, extended lazily: it ends at the
    /// first position (after at least one letter) from which only
    /// whitespace separates the cursor from the next record or the end of
    /// the text.
    fn status(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let mut has_letter = false;

        loop {
            if has_letter {
                let ahead = self.rest().trim_start();
                if ahead.is_empty() || is_record_start(ahead) {
                    let status = self.text[start..self.pos].trim_end();
                    self.pos = start + status.len();
                    return Some(status);
                }
            }

            let ch = self.peek()?;
            if ch.is_uppercase() {
                has_letter = true;
            } else if !(ch.is_whitespace() || ch == '-') {
                return None;
            }
            self.bump(ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRRF: &str = "0561-07 - IRRF 03/2023 20/04/2023 1.000,00 1.000,00 200,00 50,00 1.250,00 DEVEDOR";
    const CP: &str =
        "1082-01 - CP SEGURADOS 04/2023 20/05/2023 500,00 500,00 100,00 10,00 610,00 EM COBRANCA";
    const SIMPLES: &str =
        "SIMPLES NAC. 03/2023 10/04/2023 100,00 90,00 5,00 2,00 97,00 PENDENTE";

    #[test]
    fn parses_single_record_at_end_of_section() {
        let out = tokenize(IRRF);
        assert_eq!(out.skipped_fragments, 0);
        assert_eq!(
            out.records,
            vec![RawRecord {
                category_label: "0561-07 - IRRF",
                period: "03/2023",
                due_date: "20/04/2023",
                amounts: ["1.000,00", "1.000,00", "200,00", "50,00", "1.250,00"],
                status: "DEVEDOR",
            }]
        );
    }

    #[test]
    fn returns_every_adjacent_record_in_order() {
        let section = format!("{IRRF} {CP} {SIMPLES}");
        let out = tokenize(&section);
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.skipped_fragments, 0);

        assert_eq!(out.records[0].category_label, "0561-07 - IRRF");
        assert_eq!(out.records[0].status, "DEVEDOR");

        assert_eq!(out.records[1].category_label, "1082-01 - CP SEGURADOS");
        assert_eq!(out.records[1].period, "04/2023");
        assert_eq!(out.records[1].due_date, "20/05/2023");
        assert_eq!(
            out.records[1].amounts,
            ["500,00", "500,00", "100,00", "10,00", "610,00"]
        );
        assert_eq!(out.records[1].status, "EM COBRANCA");

        assert_eq!(out.records[2].category_label, "SIMPLES NAC.");
        assert_eq!(out.records[2].status, "PENDENTE");
    }

    #[test]
    fn status_stops_before_following_revenue_code() {
        let section = "0561-07 - IRPJ 01/2022 31/01/2022 10,00 10,00 2,00 1,00 13,00 EXIGIBILIDADE SUSPENSA 0561-07 - IRRF 02/2022 28/02/2022 20,00 20,00 4,00 2,00 26,00 DEVEDOR";
        let out = tokenize(section);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].status, "EXIGIBILIDADE SUSPENSA");
        assert_eq!(out.records[1].category_label, "0561-07 - IRRF");
    }

    #[test]
    fn status_does_not_swallow_following_simples_label() {
        let section = format!("{IRRF} {SIMPLES}");
        let out = tokenize(&section);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].status, "DEVEDOR");
        assert_eq!(out.records[1].category_label, "SIMPLES NAC.");
    }

    #[test]
    fn status_stops_at_glued_revenue_code() {
        let section = "SIMPLES NAC 03/2023 10/04/2023 1,00 1,00 1,00 1,00 1,00 A-VENCER0561-07 - IRRF 03/2023 20/04/2023 1,00 1,00 1,00 1,00 1,00 DEVEDOR";
        let out = tokenize(section);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].category_label, "SIMPLES NAC");
        assert_eq!(out.records[0].status, "A-VENCER");
        assert_eq!(out.records[1].status, "DEVEDOR");
    }

    #[test]
    fn multi_word_status_runs_to_end_of_section() {
        let section = "SIMPLES NAC. 03/2023 10/04/2023 1,00 1,00 1,00 1,00 1,00 EM COBRANCA - PARCELADO  ";
        let out = tokenize(section);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].status, "EM COBRANCA - PARCELADO");
        assert_eq!(out.skipped_fragments, 0);
    }

    #[test]
    fn malformed_record_between_valid_ones_is_skipped() {
        let section = format!("{IRRF} 1138-01 - CP PATRONAL 05/2023 texto ilegível {SIMPLES}");
        let out = tokenize(&section);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].category_label, "0561-07 - IRRF");
        assert_eq!(out.records[1].category_label, "SIMPLES NAC.");
        assert_eq!(out.skipped_fragments, 1);
    }

    #[test]
    fn status_followed_by_stray_number_drops_record() {
        let section = format!("0561-07 - IRRF 03/2023 20/04/2023 1,00 1,00 1,00 1,00 1,00 DEVEDOR 99 {CP}");
        let out = tokenize(&section);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].category_label, "1082-01 - CP SEGURADOS");
        assert_eq!(out.skipped_fragments, 1);
    }

    #[test]
    fn missing_amount_yields_no_record() {
        let section = "0561-07 - IRRF 03/2023 20/04/2023 1,00 1,00 1,00 1,00 DEVEDOR";
        let out = tokenize(section);
        assert!(out.records.is_empty());
        assert_eq!(out.skipped_fragments, 1);
    }

    #[test]
    fn amounts_accept_plain_and_single_fraction_digit() {
        let section = "0561-07 - IRRF 03/2023 20/04/2023 1000 1.000 0,5 12,34 1.012,84 DEVEDOR";
        let out = tokenize(section);
        assert_eq!(out.records.len(), 1);
        assert_eq!(
            out.records[0].amounts,
            ["1000", "1.000", "0,5", "12,34", "1.012,84"]
        );
    }

    #[test]
    fn rejects_amount_with_three_fraction_digits() {
        let section = "0561-07 - IRRF 03/2023 20/04/2023 1,000 1,00 1,00 1,00 1,00 DEVEDOR";
        assert!(tokenize(section).records.is_empty());
    }

    #[test]
    fn empty_section_has_no_records() {
        let out = tokenize("");
        assert!(out.records.is_empty());
        assert_eq!(out.skipped_fragments, 0);
    }

    #[test]
    fn record_start_detection() {
        assert!(is_record_start("0561-07 - IRRF"));
        assert!(is_record_start("SIMPLES NAC. 03/2023"));
        assert!(is_record_start("1082-01"));
        assert!(!is_record_start("0561-071"));
        assert!(!is_record_start("03/2023"));
        assert!(!is_record_start("SIMPLES"));
    }
}
