//! Response Parsing
//!
//! The tool's JSON envelope is not stable across versions, so raw output is
//! run through a chain of shape decoders in fixed priority order. A failure
//! in one decoder never prevents the next from being tried, and total
//! failure degrades to "no diagnostics" rather than an error.

pub mod shapes;

use serde_json::Value;

use crate::diagnostics::DiagnosticGroup;
use crate::invoke::RawToolOutput;
use shapes::{FlatResponse, NestedPayload, NestedResponse, ProtoResponse, WireGroup};

/// Parse one invocation's raw output into normalized diagnostic groups.
///
/// Empty stdout means the tool found nothing to report. Output that decodes
/// as none of the known shapes is logged and treated the same way.
pub fn parse_response(raw: &RawToolOutput, requested_uri: &str) -> Vec<DiagnosticGroup> {
    let stdout = raw.stdout.trim();
    if stdout.is_empty() {
        return Vec::new();
    }

    let value: Value = match serde_json::from_str(stdout) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("tool output is not valid JSON: {err}");
            return Vec::new();
        }
    };

    let decoders: [(&str, DecodeFn); 3] = [
        ("flat-list", decode_flat_list),
        ("nested-error", decode_nested_error),
        ("proto-envelope", decode_proto_envelope),
    ];

    for (name, decode) in decoders {
        match decode(&value, requested_uri) {
            Ok(groups) => return groups,
            Err(err) => log::debug!("response is not the {name} shape: {err}"),
        }
    }

    log::warn!("tool output matched no known response shape");
    Vec::new()
}

type DecodeFn = fn(&Value, &str) -> Result<Vec<DiagnosticGroup>, serde_json::Error>;

/// `{"errors": [...]}` — entries carry no file attribution, so the whole
/// list is scoped to the document that was linted.
fn decode_flat_list(
    value: &Value,
    requested_uri: &str,
) -> Result<Vec<DiagnosticGroup>, serde_json::Error> {
    let response: FlatResponse = serde_json::from_value(value.clone())?;
    let diagnostics = response
        .errors
        .into_iter()
        .map(shapes::FlatEntry::into_record)
        .collect();
    Ok(vec![DiagnosticGroup {
        uri: requested_uri.to_string(),
        diagnostics,
    }])
}

/// `{"error": "<json string>"}` — the payload is a second JSON document
/// whose `lsp.diagnostics` holds per-file groups.
fn decode_nested_error(
    value: &Value,
    _requested_uri: &str,
) -> Result<Vec<DiagnosticGroup>, serde_json::Error> {
    let response: NestedResponse = serde_json::from_value(value.clone())?;
    let payload: NestedPayload = serde_json::from_str(&response.error)?;
    Ok(payload
        .lsp
        .diagnostics
        .into_iter()
        .map(WireGroup::into_group)
        .collect())
}

/// `{"lsp_proto": {"diagnostics": [...]}}` — like the nested shape but with
/// LSP numeric severities.
fn decode_proto_envelope(
    value: &Value,
    _requested_uri: &str,
) -> Result<Vec<DiagnosticGroup>, serde_json::Error> {
    let response: ProtoResponse = serde_json::from_value(value.clone())?;
    Ok(response
        .lsp_proto
        .diagnostics
        .into_iter()
        .map(WireGroup::into_group)
        .collect())
}
