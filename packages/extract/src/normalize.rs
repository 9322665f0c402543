//! Page-noise removal and whitespace collapsing.
//!
//! Four kinds of noise are removed, in this order:
//!
//! 1. runs of two or more underscores (form separator lines)
//! 2. the repeated page header, from an institutional phrase up to the first
//!    record-start token
//! 3. `Página: n / m` footers
//! 4. whitespace runs, collapsed to one space and trimmed
//!
//! The header block before the debt section also ends at the section's start
//! marker, so the marker survives. Headers after it do not stop there: a page
//! that repeats the section title and column headings loses all of it, up to
//! its first record.
//!
//! Removed noise is replaced by a space rather than nothing, so two tokens
//! on either side of it are never glued together. That also makes
//! [`Normalizer::normalize`] idempotent.

use regex::Regex;

use crate::ConfigError;

/// Record-start tokens that end a header block. Matches where
/// [`crate::tokenizer::is_record_start`] would: at a word boundary, with
/// ASCII digits and no digit after the revenue code.
const RECORD_START_PATTERN: &str = r"\b[0-9]{4}-[0-9]{2}(?:[^0-9]|$)|\bSIMPLES NAC";

/// Page footer.
const FOOTER_PATTERN: &str = r"Página:\s*\d+\s*/\s*\d+";

/// Compiled noise patterns.
#[derive(Debug, Clone)]
pub struct Normalizer {
    underscores: Regex,
    header: Option<HeaderPatterns>,
    footer: Regex,
    whitespace: Regex,
}

#[derive(Debug, Clone)]
struct HeaderPatterns {
    /// Header ending at a record token or a start marker.
    leading: Regex,
    /// Header ending at a record token only.
    repeated: Regex,
    /// Any start marker.
    section_start: Option<Regex>,
}

impl Normalizer {
    /// Compiles a normalizer.
    ///
    /// `header_phrases` open the boilerplate header block. Up to the first
    /// occurrence of any of `start_markers` the block ends lazily at a
    /// record-start token or at the marker, whichever comes first. After it
    /// the block ends only at a record-start token. The token or marker that
    /// ends a block is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if the header pattern fails to
    /// compile.
    pub fn new(header_phrases: &[String], start_markers: &[String]) -> Result<Self, ConfigError> {
        // Footers can split a header phrase across a page break.
        let phrase_gap = format!(r"(?:\s|{FOOTER_PATTERN})+");
        let phrases: Vec<String> = header_phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| flexible_whitespace(p, &phrase_gap))
            .collect();
        let markers: Vec<String> = start_markers
            .iter()
            .filter(|m| !m.trim().is_empty())
            .map(|m| flexible_whitespace(m, r"\s+"))
            .collect();

        let header = if phrases.is_empty() {
            None
        } else {
            let phrases = phrases.join("|");
            let mut leading_stops = vec![RECORD_START_PATTERN.to_string()];
            leading_stops.extend(markers.iter().cloned());

            Some(HeaderPatterns {
                leading: compile_header(&format!(
                    "(?s)(?:{phrases}).*?({})",
                    leading_stops.join("|")
                ))?,
                repeated: compile_header(&format!(
                    "(?s)(?:{phrases}).*?({RECORD_START_PATTERN})"
                ))?,
                section_start: if markers.is_empty() {
                    None
                } else {
                    Some(compile_header(&markers.join("|"))?)
                },
            })
        };

        Ok(Self {
            underscores: Regex::new(r"_{2,}").unwrap_or_else(|_| unreachable!()),
            header,
            footer: Regex::new(FOOTER_PATTERN).unwrap_or_else(|_| unreachable!()),
            whitespace: Regex::new(r"\s+").unwrap_or_else(|_| unreachable!()),
        })
    }

    /// Normalizes a concatenated document blob.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let without_rules = self.underscores.replace_all(text, " ").into_owned();

        let without_header = match &self.header {
            Some(header) => header.strip(&without_rules),
            None => without_rules,
        };

        let without_footers = self.footer.replace_all(&without_header, " ");
        let collapsed = self.whitespace.replace_all(&without_footers, " ");

        let normalized = collapsed.trim().to_string();

        log::debug!(
            "Normalized {} characters down to {}",
            text.len(),
            normalized.len()
        );

        normalized
    }
}

impl HeaderPatterns {
    fn strip(&self, text: &str) -> String {
        let split = self
            .section_start
            .as_ref()
            .and_then(|re| re.find(text))
            .map_or(0, |m| m.end());
        let (before, after) = text.split_at(split);

        let mut out = self.leading.replace_all(before, " ${1}").into_owned();
        out.push_str(&self.repeated.replace_all(after, " ${1}"));
        out
    }
}

fn compile_header(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        name: "noise.header_phrases".to_string(),
        source,
    })
}

/// Escapes `phrase` for use in a pattern, matching `gap` wherever the
/// phrase has whitespace.
fn flexible_whitespace(phrase: &str, gap: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(gap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(
            &["MINISTÉRIO DA FAZENDA".to_string()],
            &["Pendência - Débito (SIEF)".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn collapses_whitespace_only_when_no_noise() {
        let text = "  0561-07 - IRRF\n03/2023   10/04/2023\t\tDEVEDOR \n";
        assert_eq!(
            normalizer().normalize(text),
            "0561-07 - IRRF 03/2023 10/04/2023 DEVEDOR"
        );
    }

    #[test]
    fn removes_underscore_runs_including_at_end() {
        let text = "Débitos ______ 1.234,56 _ x ____";
        assert_eq!(normalizer().normalize(text), "Débitos 1.234,56 _ x");
    }

    #[test]
    fn removes_page_footers() {
        let text = "DEVEDOR Página: 1 / 3\n\nSIMPLES NAC. 03/2023 Página:2/3";
        assert_eq!(normalizer().normalize(text), "DEVEDOR SIMPLES NAC. 03/2023");
    }

    #[test]
    fn header_removal_stops_at_first_record_code() {
        let text = "DEVEDOR\n\nMINISTÉRIO DA FAZENDA\nSECRETARIA DA RECEITA FEDERAL\nCNPJ: 12.345.678 Receita PA/Exerc. Vcto\n0561-07 - IRRF 03/2023 MINISTÉRIO DA FAZENDA header 1082-01 - CP";
        assert_eq!(
            normalizer().normalize(text),
            "DEVEDOR 0561-07 - IRRF 03/2023 1082-01 - CP"
        );
    }

    #[test]
    fn header_removal_stops_at_simples_label() {
        let text = "MINISTÉRIO DA FAZENDA Página de título SIMPLES NAC. 03/2023";
        assert_eq!(normalizer().normalize(text), "SIMPLES NAC. 03/2023");
    }

    #[test]
    fn header_removal_keeps_section_start_marker() {
        let text = "MINISTÉRIO   DA\nFAZENDA Relatório Pendência - Débito (SIEF) 0561-07 - IRRF";
        assert_eq!(
            normalizer().normalize(text),
            "Pendência - Débito (SIEF) 0561-07 - IRRF"
        );
    }

    #[test]
    fn repeated_section_title_is_removed_with_later_headers() {
        let text = "MINISTÉRIO DA FAZENDA\nRelatório\nPendência - Débito (SIEF)\nReceita PA/Exerc. Situação\n0561-07 - IRRF DEVEDOR\nPágina: 1 / 2\nMINISTÉRIO DA FAZENDA\nRelatório\nPendência - Débito (SIEF)\nReceita PA/Exerc. Situação\n2089-01 - IRPJ DEVEDOR";
        assert_eq!(
            normalizer().normalize(text),
            "Pendência - Débito (SIEF) Receita PA/Exerc. Situação 0561-07 - IRRF DEVEDOR 2089-01 - IRPJ DEVEDOR"
        );
    }

    #[test]
    fn header_ignores_codes_embedded_in_longer_numbers() {
        let text = "MINISTÉRIO DA FAZENDA CEP 12345-678 ref 0561-071 cab 0561-07 - IRRF";
        assert_eq!(normalizer().normalize(text), "0561-07 - IRRF");
    }

    #[test]
    fn footer_inside_header_phrase_is_removed_in_one_pass() {
        let n = normalizer();
        let once = n.normalize("MINISTÉRIO DA Página: 1 / 2 FAZENDA cab 0561-07 - IRRF");
        assert_eq!(once, "0561-07 - IRRF");
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn header_without_following_record_is_kept() {
        let text = "MINISTÉRIO DA FAZENDA sem registros";
        assert_eq!(normalizer().normalize(text), text);
    }

    #[test]
    fn normalization_is_idempotent() {
        let n = normalizer();
        let text = "x_\nPágina: 1 / 2\n_y __ MINISTÉRIO DA FAZENDA cabeçalho\n0561-07 - IRRF   03/2023 \n\nFinal";
        let once = n.normalize(text);
        let twice = n.normalize(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "x_ _y 0561-07 - IRRF 03/2023 Final");
    }
}
