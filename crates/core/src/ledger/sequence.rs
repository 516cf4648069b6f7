//! Document number formatting for the voucher sequence.

/// Document type of general ledger vouchers.
pub const VOUCHER_DOCUMENT_TYPE: &str = "VOU";

/// Template applied to new sequences.
pub const DEFAULT_FORMAT: &str = "{PREFIX}-{NUMBER}";

/// Zero-padding width of `{NUMBER}`.
pub const NUMBER_WIDTH: usize = 6;

/// Renders a document number from a template.
///
/// `{PREFIX}` is replaced by `prefix`, `{NUMBER}` by `number` zero-padded to
/// [`NUMBER_WIDTH`] digits. Wider numbers are printed in full.
#[must_use]
pub fn format_document_number(template: &str, prefix: &str, number: i64) -> String {
    template
        .replace("{PREFIX}", prefix)
        .replace("{NUMBER}", &format!("{number:0width$}", width = NUMBER_WIDTH))
}
