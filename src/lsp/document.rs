/// State for each open document
#[derive(Debug, Default)]
pub struct DocumentState {
    pub content: String,
    pub version: i32,
    /// Sequence number of the most recent validation issued for this
    /// document. Completions carrying an older number are discarded so a
    /// slow linter run cannot overwrite newer results.
    pub latest_seq: u64,
}
