//! Document Matching
//!
//! A response may carry groups for files other than the one that was
//! linted (imports, project-wide runs). Only the groups belonging to the
//! validated document are published for it.

use crate::diagnostics::{DiagnosticGroup, DiagnosticRecord};

/// Select the records belonging to `document_path`, preserving the order
/// groups appeared in the response and each group's internal order.
///
/// No match is "no problems", not an error.
pub fn select_for_document(
    groups: Vec<DiagnosticGroup>,
    document_path: &str,
) -> Vec<DiagnosticRecord> {
    groups
        .into_iter()
        .filter(|group| matches_document(&group.uri, document_path))
        .flat_map(|group| group.diagnostics)
        .collect()
}

/// Full-path equality is case-insensitive because the tool may report a
/// different casing or drive/mount representation than the editor uses.
/// The basename fallback covers differently-rooted absolute paths.
fn matches_document(group_uri: &str, document_path: &str) -> bool {
    let group = path_portion(group_uri);
    let document = path_portion(document_path);

    if group.eq_ignore_ascii_case(document) {
        return true;
    }

    basename(group).eq_ignore_ascii_case(basename(document))
}

fn path_portion(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
