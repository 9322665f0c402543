//! Isolates the debt section between a start and an end marker.

use strum_macros::{AsRefStr, Display};

/// Which marker of a section was looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MarkerRole {
    Start,
    End,
}

/// Errors returned by [`isolate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// No marker for `role` occurs in the text.
    #[error("Section {role} marker not found")]
    MarkerNotFound {
        /// The marker that was missing.
        role: MarkerRole,
    },
}

/// Returns the trimmed text strictly between the section markers.
///
/// `start_markers` are tried in order and the first one that occurs
/// anywhere in `text` is used. The end marker is looked up from the start of
/// `text`, not from the start marker; when it occurs before the start
/// marker ends, the section is empty.
///
/// # Errors
///
/// Returns [`SectionError::MarkerNotFound`] with [`MarkerRole::Start`] if
/// none of the start markers occur, or with [`MarkerRole::End`] if the end
/// marker does not occur.
pub fn isolate<'a>(
    text: &'a str,
    start_markers: &[String],
    end_marker: &str,
) -> Result<&'a str, SectionError> {
    let (start_idx, start_marker) = start_markers
        .iter()
        .filter(|m| !m.is_empty())
        .find_map(|m| text.find(m.as_str()).map(|idx| (idx, m)))
        .ok_or(SectionError::MarkerNotFound {
            role: MarkerRole::Start,
        })?;

    let end_idx = if end_marker.is_empty() {
        None
    } else {
        text.find(end_marker)
    }
    .ok_or(SectionError::MarkerNotFound {
        role: MarkerRole::End,
    })?;

    let body_start = start_idx + start_marker.len();
    if end_idx <= body_start {
        log::debug!("End marker at {end_idx} precedes section body at {body_start}");
        return Ok("");
    }

    Ok(text[body_start..end_idx].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(list: &[&str]) -> Vec<String> {
        list.iter().map(|&m| m.to_string()).collect()
    }

    #[test]
    fn returns_text_between_markers() {
        let text = "intro INICIO 0561-07 - IRRF dados FIM rodapé";
        let section = isolate(text, &markers(&["INICIO"]), "FIM").unwrap();
        assert_eq!(section, "0561-07 - IRRF dados");
    }

    #[test]
    fn first_listed_marker_wins_over_earlier_occurrence() {
        let text = "SEGUNDO aaa PRIMEIRO bbb FIM";
        let section = isolate(text, &markers(&["PRIMEIRO", "SEGUNDO"]), "FIM").unwrap();
        assert_eq!(section, "bbb");
    }

    #[test]
    fn falls_back_to_later_marker() {
        let text = "SEGUNDO aaa FIM";
        let section = isolate(text, &markers(&["PRIMEIRO", "SEGUNDO"]), "FIM").unwrap();
        assert_eq!(section, "aaa");
    }

    #[test]
    fn missing_start_marker() {
        let err = isolate("nada FIM", &markers(&["INICIO"]), "FIM").unwrap_err();
        assert_eq!(
            err,
            SectionError::MarkerNotFound {
                role: MarkerRole::Start
            }
        );
        assert_eq!(err.to_string(), "Section start marker not found");
    }

    #[test]
    fn missing_end_marker() {
        let err = isolate("INICIO dados", &markers(&["INICIO"]), "FIM").unwrap_err();
        assert_eq!(
            err,
            SectionError::MarkerNotFound {
                role: MarkerRole::End
            }
        );
    }

    #[test]
    fn end_before_start_yields_empty_section() {
        let text = "FIM antes INICIO dados FIM";
        assert_eq!(isolate(text, &markers(&["INICIO"]), "FIM").unwrap(), "");
    }

    #[test]
    fn end_overlapping_start_yields_empty_section() {
        let text = "Débito (SIEF) registros";
        let section = isolate(text, &markers(&["Débito (SIEF)"]), "(SIEF)").unwrap();
        assert_eq!(section, "");
    }
}
