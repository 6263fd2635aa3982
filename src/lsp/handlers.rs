use std::time::Duration;

use tower_lsp::lsp_types::*;

use crate::diagnostics::DiagnosticRecord;
use crate::invoke;
use crate::lsp::backend::Backend;
use crate::matcher::select_for_document;
use crate::parser::parse_response;

/// Trait for the per-document validation cycle
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn schedule_validation(&self, uri: Url, version: i32, delay: Duration);
    async fn validate_document(&self, uri: Url, seq: u64);
    fn create_lsp_diagnostic(&self, record: DiagnosticRecord) -> Diagnostic;
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Queue a validation run for a document.
    ///
    /// The run is stamped with the document's next sequence number before
    /// any waiting happens, so rapid edits coalesce: every earlier pending
    /// run sees a newer stamp and drops out.
    async fn schedule_validation(&self, uri: Url, version: i32, delay: Duration) {
        let seq = {
            let mut docs = self.documents.lock().await;
            let Some(state) = docs.get_mut(&uri) else {
                return;
            };
            state.latest_seq += 1;
            state.latest_seq
        };

        let backend = self.clone();
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;

                let docs = backend.documents.lock().await;
                let current = docs
                    .get(&uri)
                    .is_some_and(|state| state.version == version && state.latest_seq == seq);
                if !current {
                    return;
                }
            }

            backend.validate_document(uri, seq).await;
        });
    }

    /// Run the full pipeline for one document: invoke the linter, parse
    /// whatever shape it produced, select this document's groups, publish.
    async fn validate_document(&self, uri: Url, seq: u64) {
        let Ok(path) = uri.to_file_path() else {
            log::debug!("skipping non-file document {uri}");
            return;
        };

        let raw = match invoke::invoke(&self.config, &path).await {
            Ok(raw) => raw,
            Err(err) => {
                // Nothing is published: a broken tool run says nothing
                // about the document, so the previous set stays in place.
                log::error!("linter run failed for {}: {err}", path.display());
                return;
            }
        };

        if !raw.stderr.trim().is_empty() {
            log::warn!("linter stderr for {}: {}", path.display(), raw.stderr.trim());
        }

        let requested = path.to_string_lossy();
        let groups = parse_response(&raw, &requested);
        let records = select_for_document(groups, &requested);

        // Only the most recently issued run may publish; anything else is
        // a stale result from before a newer edit.
        let version = {
            let docs = self.documents.lock().await;
            match docs.get(&uri) {
                Some(state) if state.latest_seq == seq => state.version,
                Some(_) => {
                    log::debug!("dropping stale lint results for {uri}");
                    return;
                }
                None => return,
            }
        };

        let diagnostics: Vec<Diagnostic> = records
            .into_iter()
            .map(|record| self.create_lsp_diagnostic(record))
            .collect();

        log::debug!(
            "publishing {} diagnostic(s) for {} (version {version})",
            diagnostics.len(),
            uri
        );
        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }

    fn create_lsp_diagnostic(&self, record: DiagnosticRecord) -> Diagnostic {
        record.into_lsp(self.config.source_name())
    }
}
