//! Serde wire types for the tool's response shapes.
//!
//! Three envelopes exist in the wild. The flat list is the oldest; the
//! nested-error envelope wraps a second JSON document inside a string; the
//! proto envelope switched severities to LSP numeric codes and added
//! related locations.

use serde::Deserialize;

use crate::diagnostics::{
    DiagnosticGroup, DiagnosticRecord, RelatedLocation, Severity, range_from_raw,
};

/// Flat-list response: `{"errors": [...]}`, no per-file grouping.
#[derive(Debug, Deserialize)]
pub struct FlatResponse {
    pub errors: Vec<FlatEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FlatEntry {
    pub message: String,
    pub severity: RawSeverity,
    pub range: WireRange,
    #[serde(default)]
    pub code: Option<RawCode>,
}

/// Nested-error response: `{"error": "<json string>"}` whose payload holds
/// `lsp.diagnostics`.
#[derive(Debug, Deserialize)]
pub struct NestedResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct NestedPayload {
    pub lsp: LspEnvelope,
}

/// Proto response: `{"lsp_proto": {"diagnostics": [...]}}`.
#[derive(Debug, Deserialize)]
pub struct ProtoResponse {
    pub lsp_proto: LspEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct LspEnvelope {
    pub diagnostics: Vec<WireGroup>,
}

/// One file's diagnostics as grouped by the tool.
#[derive(Debug, Deserialize)]
pub struct WireGroup {
    pub uri: String,
    #[serde(default)]
    pub diagnostics: Vec<WireDiagnostic>,
}

#[derive(Debug, Deserialize)]
pub struct WireDiagnostic {
    pub message: String,
    pub severity: RawSeverity,
    pub range: WireRange,
    #[serde(default)]
    pub code: Option<RawCode>,
    #[serde(default, rename = "relatedInformation")]
    pub related_information: Vec<WireRelated>,
}

#[derive(Debug, Deserialize)]
pub struct WireRelated {
    pub location: WireLocation,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct WireLocation {
    pub uri: String,
    pub range: WireRange,
}

/// Coordinates as the tool sends them. Signed so that malformed negative
/// values can be clamped instead of failing the whole decode.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireRange {
    pub start: WirePosition,
    pub end: WirePosition,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WirePosition {
    pub line: i64,
    pub character: i64,
}

/// Severity as the tool encodes it: a label in older envelopes, an LSP
/// numeric code in the proto envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSeverity {
    Label(String),
    Code(i64),
}

impl RawSeverity {
    pub fn normalize(&self) -> Severity {
        match self {
            RawSeverity::Label(label) => Severity::from_label(label),
            RawSeverity::Code(code) => Severity::from_code(*code),
        }
    }
}

/// Diagnostic codes appear both as strings ("W001") and bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawCode {
    Text(String),
    Number(i64),
}

impl RawCode {
    pub fn into_string(self) -> String {
        match self {
            RawCode::Text(text) => text,
            RawCode::Number(number) => number.to_string(),
        }
    }
}

impl WireRange {
    fn normalize(self) -> tower_lsp::lsp_types::Range {
        range_from_raw(
            self.start.line,
            self.start.character,
            self.end.line,
            self.end.character,
        )
    }
}

impl FlatEntry {
    pub fn into_record(self) -> DiagnosticRecord {
        DiagnosticRecord {
            range: self.range.normalize(),
            message: self.message,
            severity: self.severity.normalize(),
            code: self.code.map(RawCode::into_string),
            related: Vec::new(),
        }
    }
}

impl WireDiagnostic {
    pub fn into_record(self) -> DiagnosticRecord {
        DiagnosticRecord {
            range: self.range.normalize(),
            message: self.message,
            severity: self.severity.normalize(),
            code: self.code.map(RawCode::into_string),
            related: self
                .related_information
                .into_iter()
                .map(|rel| RelatedLocation {
                    uri: rel.location.uri,
                    range: rel.location.range.normalize(),
                    message: rel.message,
                })
                .collect(),
        }
    }
}

impl WireGroup {
    pub fn into_group(self) -> DiagnosticGroup {
        DiagnosticGroup {
            uri: self.uri,
            diagnostics: self
                .diagnostics
                .into_iter()
                .map(WireDiagnostic::into_record)
                .collect(),
        }
    }
}
