//! Canonical diagnostic model.
//!
//! Everything the external tool reports is normalized into these types
//! before any LSP conversion happens. Records are immutable once built.

use tower_lsp::lsp_types::{
    self, DiagnosticRelatedInformation, Location, NumberOrString, Position, Range, Url,
};

/// Severity of a reported issue, ordered by urgency (most severe first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    /// Map the tool's numeric severity encoding (1=Error .. 4=Hint).
    ///
    /// Values outside the known range map to `Error` so that unrecognized
    /// severities are surfaced rather than silently dropped.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Severity::Error,
            2 => Severity::Warning,
            3 => Severity::Information,
            4 => Severity::Hint,
            _ => Severity::Error,
        }
    }

    /// Map the tool's string severity encoding.
    ///
    /// Only "error" (any case) maps to `Error`; every other label the tool
    /// emits is a warning.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("error") {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    pub fn to_lsp(self) -> lsp_types::DiagnosticSeverity {
        match self {
            Severity::Error => lsp_types::DiagnosticSeverity::ERROR,
            Severity::Warning => lsp_types::DiagnosticSeverity::WARNING,
            Severity::Information => lsp_types::DiagnosticSeverity::INFORMATION,
            Severity::Hint => lsp_types::DiagnosticSeverity::HINT,
        }
    }
}

/// A location in another file the diagnostic refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedLocation {
    pub uri: String,
    pub range: Range,
    pub message: String,
}

/// A single normalized diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRecord {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub code: Option<String>,
    pub related: Vec<RelatedLocation>,
}

/// Diagnostics the tool attributed to one file URI within a single response.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticGroup {
    pub uri: String,
    pub diagnostics: Vec<DiagnosticRecord>,
}

/// Enforce `start <= end` on (line, character), clamping the end back onto
/// the start instead of propagating a negative span.
pub fn clamp_range(range: Range) -> Range {
    let start = (range.start.line, range.start.character);
    let end = (range.end.line, range.end.character);
    if end < start {
        Range::new(range.start, range.start)
    } else {
        range
    }
}

impl DiagnosticRecord {
    /// Convert into the protocol diagnostic published to the client.
    pub fn into_lsp(self, source: &str) -> lsp_types::Diagnostic {
        let related: Vec<DiagnosticRelatedInformation> = self
            .related
            .into_iter()
            .filter_map(|rel| {
                let Some(uri) = location_url(&rel.uri) else {
                    log::debug!("dropping related location with unusable uri: {}", rel.uri);
                    return None;
                };
                Some(DiagnosticRelatedInformation {
                    location: Location::new(uri, rel.range),
                    message: rel.message,
                })
            })
            .collect();

        lsp_types::Diagnostic {
            range: self.range,
            severity: Some(self.severity.to_lsp()),
            code: self.code.map(NumberOrString::String),
            code_description: None,
            source: Some(source.to_string()),
            message: self.message,
            related_information: if related.is_empty() {
                None
            } else {
                Some(related)
            },
            tags: None,
            data: None,
        }
    }
}

/// Interpret a tool-reported location as a URL. The tool emits either real
/// `file://` URIs or bare absolute paths depending on version.
fn location_url(uri: &str) -> Option<Url> {
    if uri.contains("://") {
        Url::parse(uri).ok()
    } else {
        Url::from_file_path(uri).ok()
    }
}

/// Build a range from raw (possibly negative) coordinates.
pub fn range_from_raw(
    start_line: i64,
    start_character: i64,
    end_line: i64,
    end_character: i64,
) -> Range {
    fn coord(value: i64) -> u32 {
        u32::try_from(value.max(0)).unwrap_or(u32::MAX)
    }

    clamp_range(Range::new(
        Position::new(coord(start_line), coord(start_character)),
        Position::new(coord(end_line), coord(end_character)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_code() {
        assert_eq!(Severity::from_code(1), Severity::Error);
        assert_eq!(Severity::from_code(2), Severity::Warning);
        assert_eq!(Severity::from_code(3), Severity::Information);
        assert_eq!(Severity::from_code(4), Severity::Hint);
    }

    #[test]
    fn test_severity_unknown_code_is_error() {
        assert_eq!(Severity::from_code(0), Severity::Error);
        assert_eq!(Severity::from_code(99), Severity::Error);
        assert_eq!(Severity::from_code(-1), Severity::Error);
    }

    #[test]
    fn test_severity_from_label() {
        assert_eq!(Severity::from_label("error"), Severity::Error);
        assert_eq!(Severity::from_label("Error"), Severity::Error);
        assert_eq!(Severity::from_label("ERROR"), Severity::Error);
        assert_eq!(Severity::from_label("warning"), Severity::Warning);
        assert_eq!(Severity::from_label("note"), Severity::Warning);
        assert_eq!(Severity::from_label(""), Severity::Warning);
    }

    #[test]
    fn test_severity_ordered_by_urgency() {
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Information);
        assert!(Severity::Information < Severity::Hint);
    }

    #[test]
    fn test_clamp_range_keeps_valid_span() {
        let range = Range::new(Position::new(2, 0), Position::new(2, 5));
        assert_eq!(clamp_range(range), range);
    }

    #[test]
    fn test_clamp_range_collapses_negative_span() {
        let range = Range::new(Position::new(3, 4), Position::new(2, 10));
        let clamped = clamp_range(range);
        assert_eq!(clamped.start, clamped.end);
        assert_eq!(clamped.start, Position::new(3, 4));
    }

    #[test]
    fn test_clamp_range_same_line_reversed_characters() {
        let range = Range::new(Position::new(1, 8), Position::new(1, 2));
        let clamped = clamp_range(range);
        assert_eq!(clamped.end, Position::new(1, 8));
    }

    #[test]
    fn test_range_from_raw_clamps_negatives_to_zero() {
        let range = range_from_raw(-1, -5, 0, 3);
        assert_eq!(range.start, Position::new(0, 0));
        assert_eq!(range.end, Position::new(0, 3));
    }

    #[test]
    fn test_into_lsp_carries_all_fields() {
        let record = DiagnosticRecord {
            range: Range::new(Position::new(2, 0), Position::new(2, 5)),
            message: "unused variable".to_string(),
            severity: Severity::Warning,
            code: Some("W001".to_string()),
            related: vec![RelatedLocation {
                uri: "/project/other.py".to_string(),
                range: Range::new(Position::new(0, 0), Position::new(0, 1)),
                message: "first declared here".to_string(),
            }],
        };

        let diag = record.into_lsp("lint");
        assert_eq!(diag.severity, Some(lsp_types::DiagnosticSeverity::WARNING));
        assert_eq!(diag.source.as_deref(), Some("lint"));
        assert_eq!(diag.message, "unused variable");
        assert_eq!(diag.code, Some(NumberOrString::String("W001".to_string())));
        let related = diag.related_information.expect("related info");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].message, "first declared here");
        assert_eq!(related[0].location.uri.path(), "/project/other.py");
    }

    #[test]
    fn test_into_lsp_omits_empty_related() {
        let record = DiagnosticRecord {
            range: Range::default(),
            message: "m".to_string(),
            severity: Severity::Error,
            code: None,
            related: Vec::new(),
        };
        let diag = record.into_lsp("lint");
        assert!(diag.related_information.is_none());
        assert!(diag.code.is_none());
    }

    #[test]
    fn test_location_url_accepts_uri_and_path() {
        assert!(location_url("file:///project/foo.py").is_some());
        assert!(location_url("/project/foo.py").is_some());
        assert!(location_url("relative/foo.py").is_none());
    }
}
